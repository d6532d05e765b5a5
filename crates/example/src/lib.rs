//! Greeter example built with ordo.
//!
//! One resource and one module with two systems:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Greeter                                 │
//! │                                          │
//! │  ┌─────────┐   after   ┌───────────────┐ │
//! │  │ execute │ ◀──────── │ after_execute │ │
//! │  └─────────┘           └───────┬───────┘ │
//! │                                │ writes  │
//! │                                ▼         │
//! │                            ┌─────┐       │
//! │                            │ Iam │       │
//! │                            └─────┘       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! `after_execute` is declared first but ordered after `execute`, so the
//! built schedule runs `execute` then `after_execute`.

use ordo_system::module::Module;
use ordo_system::param::write;
use ordo_system::resource::{ResourceKey, Resources};
use ordo_system::scheduler::{ScheduleError, Scheduler};
use ordo_system::system::SystemDescriptor;

/// The example resource. Echoes on request and counts how often it did.
#[derive(Debug, Default)]
pub struct Iam {
    echoes: usize,
}

impl Iam {
    /// Logs and returns the echo line.
    pub fn echo(&mut self) -> &'static str {
        self.echoes += 1;
        tracing::info!("iam echo");
        "iam echo"
    }

    /// Returns how many times [`echo`](Self::echo) was called.
    #[must_use]
    pub fn echoes(&self) -> usize {
        self.echoes
    }
}

/// Lines produced by the greeter systems, in order.
#[derive(Debug, Default)]
pub struct Transcript(Vec<&'static str>);

impl Transcript {
    fn say(&mut self, line: &'static str) {
        tracing::info!("{line}");
        self.0.push(line);
    }

    /// Returns the recorded lines.
    #[must_use]
    pub fn lines(&self) -> &[&'static str] {
        &self.0
    }
}

/// The greeter module.
#[derive(Debug)]
pub struct Greeter {
    iam: ResourceKey<Iam>,
    transcript: ResourceKey<Transcript>,
    execute: SystemDescriptor,
    after_execute: SystemDescriptor,
}

impl Greeter {
    /// Declares the module's resources into `resources` and builds its
    /// systems against them.
    pub fn declare(resources: &mut Resources) -> Self {
        let iam = resources.declare::<Iam>();
        let transcript = resources.declare::<Transcript>();

        let execute = SystemDescriptor::builder("execute")
            .dependencies(write(transcript))
            .build(|args| {
                args.res_mut::<Transcript>(0)?.say("Hello from Main");
                Ok(())
            });

        let after_execute = SystemDescriptor::builder("after_execute")
            .after(&execute)
            .dependencies((write(iam), write(transcript)))
            .build(|args| {
                let mut transcript = args.res_mut::<Transcript>(1)?;
                transcript.say("Hello from AfterExecute");
                let echo = args.res_mut::<Iam>(0)?.echo();
                transcript.0.push(echo);
                Ok(())
            });

        Self {
            iam,
            transcript,
            execute,
            after_execute,
        }
    }

    /// Returns the key of the [`Iam`] resource.
    #[must_use]
    pub fn iam(&self) -> ResourceKey<Iam> {
        self.iam
    }

    /// Returns the key of the [`Transcript`] resource.
    #[must_use]
    pub fn transcript(&self) -> ResourceKey<Transcript> {
        self.transcript
    }
}

impl Module for Greeter {
    fn systems(&self) -> Vec<SystemDescriptor> {
        vec![self.after_execute.clone(), self.execute.clone()]
    }
}

/// Registers `greeter`, builds the schedule and runs it once.
///
/// # Errors
///
/// Returns the first registration, build or run error.
pub fn run_once(greeter: &Greeter, resources: &Resources) -> Result<Scheduler, ScheduleError> {
    let mut scheduler = Scheduler::new();
    scheduler.register(greeter)?;
    scheduler.build()?;
    scheduler.run(resources)?;
    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_runs_before_after_execute() {
        let mut resources = Resources::new();
        let greeter = Greeter::declare(&mut resources);

        let scheduler = run_once(&greeter, &resources).unwrap();

        assert_eq!(scheduler.schedule().names(), vec!["execute", "after_execute"]);
        assert_eq!(
            resources.get(&greeter.transcript()).unwrap().lines(),
            &["Hello from Main", "Hello from AfterExecute", "iam echo"]
        );
        assert_eq!(resources.get(&greeter.iam()).unwrap().echoes(), 1);
    }

    #[test]
    fn module_lists_after_execute_first() {
        let mut resources = Resources::new();
        let greeter = Greeter::declare(&mut resources);

        let names: Vec<_> = greeter.systems().iter().map(SystemDescriptor::name).collect();
        assert_eq!(names, vec!["after_execute", "execute"]);
    }

    #[test]
    fn empty_store_fails_at_first_system() {
        let mut resources = Resources::new();
        let greeter = Greeter::declare(&mut resources);

        let err = run_once(&greeter, &Resources::new()).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::ResourceNotFound { system: "execute", resource }
                if resource.ends_with("Transcript")
        ));
    }
}
