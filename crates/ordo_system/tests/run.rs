//! Execution tests: resource injection and `Scheduler::run`.

use std::sync::Arc;

use parking_lot::Mutex;

use ordo_system::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test Resources
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Iam {
    echoes: usize,
}

impl Iam {
    fn echo(&mut self) -> &'static str {
        self.echoes += 1;
        "iam echo"
    }
}

#[derive(Debug, Default)]
struct Greeting(String);

#[derive(Debug, Default)]
struct Missing;

/// Shared call log, cloned into each system body.
#[derive(Debug, Clone, Default)]
struct CallLog(Arc<Mutex<Vec<&'static str>>>);

impl CallLog {
    fn record(&self, name: &'static str) {
        self.0.lock().push(name);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.0.lock().clone()
    }
}

fn logged(log: &CallLog, name: &'static str) -> SystemDescriptor {
    let log = log.clone();
    SystemDescriptor::builder(name)
        .dependencies(())
        .build(move |_| {
            log.record(name);
            Ok(())
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Injection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn system_receives_the_declared_instance() {
    let mut resources = Resources::new();
    let iam = resources.declare::<Iam>();

    let echo = SystemDescriptor::builder("echo")
        .dependencies(write(iam))
        .build(|args| {
            assert_eq!(args.res_mut::<Iam>(0)?.echo(), "iam echo");
            Ok(())
        });

    let mut scheduler = Scheduler::new();
    scheduler.register(&[echo]).unwrap();
    scheduler.build().unwrap();
    scheduler.run(&resources).unwrap();

    assert_eq!(resources.get(&iam).unwrap().echoes, 1);
}

#[test]
fn same_type_declared_twice_injects_the_right_one() {
    let mut resources = Resources::new();
    let first = resources.insert(Greeting("first".into()));
    let second = resources.insert(Greeting("second".into()));

    let seen = CallLog::default();
    let system = {
        let seen = seen.clone();
        SystemDescriptor::builder("pick_second")
            .dependencies(read(second))
            .build(move |args| {
                let greeting = args.res::<Greeting>(0)?;
                seen.record(if greeting.0 == "second" { "second" } else { "other" });
                Ok(())
            })
    };

    let mut scheduler = Scheduler::new();
    scheduler.add_system(system).unwrap();
    scheduler.run(&resources).unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(seen.calls(), vec!["second"]);
}

#[test]
fn resources_arrive_in_declared_order() {
    let mut resources = Resources::new();
    let iam = resources.declare::<Iam>();
    let greeting = resources.insert(Greeting("hello".into()));

    let system = SystemDescriptor::builder("ordered")
        .dependencies((read(greeting), write(iam)))
        .build(|args| {
            assert_eq!(args.len(), 2);
            assert_eq!(args.res::<Greeting>(0)?.0, "hello");
            args.res_mut::<Iam>(1)?.echo();
            Ok(())
        });

    let mut scheduler = Scheduler::new();
    scheduler.add_system(system).unwrap();
    scheduler.run(&resources).unwrap();

    assert_eq!(resources.get(&iam).unwrap().echoes, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Run order
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn systems_run_once_each_in_final_order() {
    let log = CallLog::default();
    let s2 = logged(&log, "s2");
    let s3 = logged(&log, "s3");
    let s1 = {
        let log = log.clone();
        SystemDescriptor::builder("s1")
            .after(&s2)
            .dependencies(())
            .build(move |_| {
                log.record("s1");
                Ok(())
            })
    };

    let mut scheduler = Scheduler::new();
    scheduler.register(&[s1, s2, s3]).unwrap();
    scheduler.build().unwrap();
    scheduler.run(&Resources::new()).unwrap();

    assert_eq!(log.calls(), vec!["s2", "s1", "s3"]);
}

#[test]
fn run_before_build_uses_registration_order() {
    let log = CallLog::default();
    let a = logged(&log, "a");
    let b = {
        let log = log.clone();
        SystemDescriptor::builder("b")
            .dependencies(())
            .build(move |_| {
                log.record("b");
                Ok(())
            })
    };
    let c = SystemDescriptor::builder("c")
        .after(&b)
        .dependencies(())
        .build(|_| Ok(()));

    let mut scheduler = Scheduler::new();
    scheduler.register(&[c, a, b]).unwrap();
    scheduler.run(&Resources::new()).unwrap();

    assert!(!scheduler.is_built());
    assert_eq!(log.calls(), vec!["a", "b"]);
}

#[test]
fn running_twice_runs_everything_twice() {
    let log = CallLog::default();
    let mut scheduler = Scheduler::new();
    scheduler.register(&[logged(&log, "a"), logged(&log, "b")]).unwrap();
    scheduler.build().unwrap();

    let resources = Resources::new();
    scheduler.run(&resources).unwrap();
    scheduler.run(&resources).unwrap();

    assert_eq!(log.calls(), vec!["a", "b", "a", "b"]);
}

#[test]
fn empty_scheduler_runs() {
    let mut scheduler = Scheduler::new();
    scheduler.build().unwrap();
    scheduler.run(&Resources::new()).unwrap();
    assert!(scheduler.schedule().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_resource_fails_fast() {
    let mut elsewhere = Resources::new();
    let missing = elsewhere.declare::<Missing>();

    let log = CallLog::default();
    let before = logged(&log, "before");
    let needs_missing = {
        let log = log.clone();
        SystemDescriptor::builder("needs_missing")
            .dependencies(read(missing))
            .build(move |_| {
                log.record("needs_missing");
                Ok(())
            })
    };
    let later = logged(&log, "later");

    let mut scheduler = Scheduler::new();
    scheduler.register(&[before, needs_missing, later]).unwrap();
    scheduler.build().unwrap();

    let err = scheduler.run(&Resources::new()).unwrap_err();

    assert!(matches!(
        err,
        ScheduleError::ResourceNotFound { system: "needs_missing", resource }
            if resource == missing.type_name()
    ));
    assert!(err.to_string().contains("Missing"));
    assert!(err.to_string().starts_with("resource of type"));
    assert_eq!(log.calls(), vec!["before"]);
}

#[test]
fn unresolved_dependencies_are_rejected_at_registration() {
    let log = CallLog::default();
    let resolved = logged(&log, "resolved");
    let unresolved = SystemDescriptor::builder("unresolved").build(|_| Ok(()));

    let mut scheduler = Scheduler::new();
    let err = scheduler.register(&[resolved.clone(), unresolved.clone()]).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::UnresolvedDependencies { system: "unresolved" }
    ));
    assert!(scheduler.schedule().is_empty());

    let err = scheduler.add_system(unresolved).unwrap_err();
    assert!(matches!(err, ScheduleError::UnresolvedDependencies { .. }));

    assert!(scheduler.add_system(resolved).unwrap());
}

#[test]
fn system_error_aborts_the_run() {
    let log = CallLog::default();
    let failing = SystemDescriptor::builder("failing")
        .dependencies(())
        .build(|_| Err(SystemError::Execution("refused".into())));
    let later = logged(&log, "later");

    let mut scheduler = Scheduler::new();
    scheduler.register(&[failing, later]).unwrap();

    let err = scheduler.run(&Resources::new()).unwrap_err();

    assert_eq!(err.to_string(), "system `failing` failed: execution error: refused");
    assert!(log.calls().is_empty());
}
