//! Registration, build and run.
//!
//! The [`Scheduler`] drives a [`Schedule`] through its lifecycle:
//!
//! 1. **Register** - modules (or single descriptors) are added in the order
//!    given. Systems already present are skipped.
//! 2. **Build** - every registered system applies its ordering directives,
//!    in registration order, each system's directives in declaration order.
//! 3. **Run** - systems execute once each, in the final order, with their
//!    dependencies resolved from a [`Resources`] store.
//!
//! # Example
//!
//! ```
//! use ordo_system::param::{read, write};
//! use ordo_system::resource::Resources;
//! use ordo_system::scheduler::Scheduler;
//! use ordo_system::system::SystemDescriptor;
//!
//! #[derive(Default)]
//! struct Log(Vec<&'static str>);
//!
//! let mut resources = Resources::new();
//! let log = resources.declare::<Log>();
//!
//! let first = SystemDescriptor::builder("first")
//!     .dependencies(write(log))
//!     .build(move |args| {
//!         args.res_mut::<Log>(0)?.0.push("first");
//!         Ok(())
//!     });
//! let second = SystemDescriptor::builder("second")
//!     .after(&first)
//!     .dependencies(write(log))
//!     .build(move |args| {
//!         args.res_mut::<Log>(0)?.0.push("second");
//!         Ok(())
//!     });
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register(&[second, first]).unwrap();
//! scheduler.build().unwrap();
//! scheduler.run(&resources).unwrap();
//!
//! assert_eq!(resources.get(&log).unwrap().0, vec!["first", "second"]);
//! ```

use crate::module::Module;
use crate::param::{ParamError, SystemArgs};
use crate::resource::Resources;
use crate::schedule::Schedule;
use crate::system::{SystemDescriptor, SystemId};

pub use crate::schedule::ScheduleError;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// What [`Scheduler::build`] does with a directive whose target is not
/// scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTarget {
    /// Abort the build with [`ScheduleError::UnknownTarget`].
    #[default]
    Error,
    /// Skip the directive and leave the order unchanged.
    Ignore,
}

/// Scheduler behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerConfig {
    /// Policy for directives that refer to unscheduled systems.
    pub unknown_target: UnknownTarget,
}

impl SchedulerConfig {
    /// Sets the policy for directives that refer to unscheduled systems.
    #[must_use]
    pub fn with_unknown_target(mut self, policy: UnknownTarget) -> Self {
        self.unknown_target = policy;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the schedule and runs it.
#[derive(Debug, Default)]
pub struct Scheduler {
    schedule: Schedule,
    /// Registration order, which `build` walks. The schedule's own order
    /// changes as directives apply.
    registered: Vec<SystemId>,
    config: SchedulerConfig,
    built: bool,
}

impl Scheduler {
    /// Creates a scheduler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with the given configuration.
    #[must_use]
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Returns the schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns `true` once [`build`](Self::build) has completed and no system
    /// has been added since.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Registers every system of `module`.
    ///
    /// Systems whose identity is already scheduled are skipped, so
    /// registering the same module twice is harmless. Nothing is added if
    /// any system of the module has an undeclared dependency list.
    ///
    /// Returns the number of systems that were newly added.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnresolvedDependencies`] naming the first
    /// system whose dependency list was never declared.
    pub fn register<M: Module + ?Sized>(&mut self, module: &M) -> Result<usize, ScheduleError> {
        let systems = module.systems();

        if let Some(unresolved) = systems.iter().find(|system| !system.is_resolved()) {
            return Err(ScheduleError::UnresolvedDependencies {
                system: unresolved.name(),
            });
        }

        let mut added = 0;
        for system in systems {
            if self.insert(system) {
                added += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(module = module.name(), added, "registered module");

        Ok(added)
    }

    /// Registers a single system.
    ///
    /// Returns `false` if the system was already scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnresolvedDependencies`] if the system's
    /// dependency list was never declared.
    pub fn add_system(&mut self, system: SystemDescriptor) -> Result<bool, ScheduleError> {
        if !system.is_resolved() {
            return Err(ScheduleError::UnresolvedDependencies {
                system: system.name(),
            });
        }
        Ok(self.insert(system))
    }

    fn insert(&mut self, system: SystemDescriptor) -> bool {
        let id = system.id();
        if self.schedule.contains(id) {
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(system = system.name(), id = %id, "adding system");

        self.registered.push(id);
        self.schedule.add_system(system);
        // The new system's directives have not been applied yet.
        self.built = false;
        true
    }

    /// Applies every registered system's ordering directives.
    ///
    /// Systems are visited in registration order and each system's
    /// directives in the order they were declared. Calling `build` again
    /// applies all directives once more on top of the current order.
    ///
    /// # Errors
    ///
    /// With [`UnknownTarget::Error`] (the default), returns
    /// [`ScheduleError::UnknownTarget`] for the first directive whose target
    /// is not scheduled. Directives applied before the failure keep their
    /// effect.
    pub fn build(&mut self) -> Result<(), ScheduleError> {
        let directives: Vec<_> = self
            .registered
            .iter()
            .filter_map(|&id| self.schedule.get(id))
            .map(|system| (system.id(), system.priorities().to_vec()))
            .collect();

        for (id, priorities) in directives {
            for priority in priorities {
                match priority.apply(&mut self.schedule, id) {
                    Ok(()) => {}
                    Err(ScheduleError::UnknownTarget { system, target })
                        if self.config.unknown_target == UnknownTarget::Ignore =>
                    {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            system,
                            target = %target,
                            "ignoring ordering directive with unscheduled target"
                        );
                        #[cfg(not(feature = "tracing"))]
                        let _ = (system, target);
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        self.built = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(order = ?self.schedule.names(), "schedule built");

        Ok(())
    }

    /// Runs every scheduled system once, in order.
    ///
    /// Each system's dependencies are resolved from `resources` immediately
    /// before it runs and handed to it in declared order. Running before
    /// [`build`](Self::build) uses the registration order.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::ResourceNotFound`] if a system depends on a
    ///   resource that is not in `resources`. The failing system and every
    ///   system after it do not run.
    /// - [`ScheduleError::System`] if a system returns an error. Later
    ///   systems do not run.
    pub fn run(&self, resources: &Resources) -> Result<(), ScheduleError> {
        #[cfg(feature = "tracing")]
        tracing::info!(systems = self.schedule.len(), "running schedule");

        for system in self.schedule.iter() {
            run_system(system, resources)?;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("schedule complete");

        Ok(())
    }
}

fn run_system(system: &SystemDescriptor, resources: &Resources) -> Result<(), ScheduleError> {
    let name = system.name();
    let dependencies = system
        .dependencies()
        .ok_or(ScheduleError::UnresolvedDependencies { system: name })?;

    let args = SystemArgs::resolve(name, dependencies, resources).map_err(|err| match err {
        ParamError::ResourceNotFound(resource) => ScheduleError::ResourceNotFound {
            system: name,
            resource,
        },
        other => ScheduleError::System {
            system: name,
            source: other.into(),
        },
    })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(system = name, id = %system.id(), "running system");

    system
        .call(&args)
        .map_err(|source| ScheduleError::System { system: name, source })
}
