//! The linear execution order.
//!
//! A [`Schedule`] owns every registered [`SystemDescriptor`] and keeps their
//! identities in a single ordered sequence. Systems are appended as they are
//! added; afterwards only ordering directives ([`Priority`]) move them, and
//! only by swapping pairs of positions.
//!
//! The sequence and the descriptor map always hold exactly the same
//! identities, and the sequence never holds one twice.

mod priority;

pub use priority::{IntoPriorities, Priority, after};

use hashbrown::HashMap;

use crate::system::{SystemDescriptor, SystemError, SystemId};

// ─────────────────────────────────────────────────────────────────────────────
// ScheduleError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while registering, building or running a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A system was registered before its dependency list was declared.
    #[error("system `{system}` was registered with an unresolved dependency list")]
    UnresolvedDependencies {
        /// Name of the offending system.
        system: &'static str,
    },

    /// A directive was applied on behalf of a system that is not scheduled.
    #[error("system {system} is not part of the schedule")]
    UnknownSystem {
        /// Identity that could not be located.
        system: SystemId,
    },

    /// A directive refers to a system that is not scheduled.
    #[error("system `{system}` is ordered after {target}, which is not part of the schedule")]
    UnknownTarget {
        /// Name of the system owning the directive.
        system: &'static str,
        /// Identity of the missing target.
        target: SystemId,
    },

    /// A declared dependency has no instance in the store.
    #[error("resource of type {resource} not found (required by `{system}`)")]
    ResourceNotFound {
        /// Name of the system that could not run.
        system: &'static str,
        /// Declared type name of the missing resource.
        resource: &'static str,
    },

    /// A system body returned an error.
    #[error("system `{system}` failed: {source}")]
    System {
        /// Name of the failing system.
        system: &'static str,
        /// The error returned by the system.
        #[source]
        source: SystemError,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Schedule
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered collection of systems.
#[derive(Debug, Default)]
pub struct Schedule {
    priority: Vec<SystemId>,
    systems: HashMap<SystemId, SystemDescriptor>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `system` to the end of the order.
    ///
    /// No duplicate detection happens here; adding the same identity twice
    /// breaks the schedule's invariants. [`Scheduler`](crate::scheduler::Scheduler)
    /// guards against it.
    pub fn add_system(&mut self, system: SystemDescriptor) {
        let id = system.id();
        self.priority.push(id);
        self.systems.insert(id, system);
    }

    /// Returns the current execution order.
    #[must_use]
    pub fn priority(&self) -> &[SystemId] {
        &self.priority
    }

    /// Returns the descriptor for `id`.
    #[must_use]
    pub fn get(&self, id: SystemId) -> Option<&SystemDescriptor> {
        self.systems.get(&id)
    }

    /// Returns `true` if `id` is scheduled.
    #[must_use]
    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.contains_key(&id)
    }

    /// Returns the position of `id` in the execution order.
    #[must_use]
    pub fn position(&self, id: SystemId) -> Option<usize> {
        self.priority.iter().position(|&other| other == id)
    }

    /// Returns the number of scheduled systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.priority.len()
    }

    /// Returns `true` if nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priority.is_empty()
    }

    /// Iterates over the descriptors in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &SystemDescriptor> {
        self.priority.iter().filter_map(|id| self.systems.get(id))
    }

    /// Returns the system names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(SystemDescriptor::name).collect()
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.priority.swap(a, b);
    }

    fn name_of(&self, id: SystemId) -> &'static str {
        self.systems.get(&id).map_or("<unknown>", SystemDescriptor::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(name: &'static str) -> SystemDescriptor {
        SystemDescriptor::builder(name).dependencies(()).build(|_| Ok(()))
    }

    #[test]
    fn new_schedule_is_empty() {
        let schedule = Schedule::new();

        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 0);
        assert!(schedule.names().is_empty());
    }

    #[test]
    fn add_system_appends_in_order() {
        let (a, b, c) = (system("a"), system("b"), system("c"));
        let mut schedule = Schedule::new();

        schedule.add_system(a.clone());
        schedule.add_system(b.clone());
        schedule.add_system(c.clone());

        assert_eq!(schedule.priority(), &[a.id(), b.id(), c.id()]);
        assert_eq!(schedule.names(), vec!["a", "b", "c"]);
        assert_eq!(schedule.position(c.id()), Some(2));
    }

    #[test]
    fn lookup_by_id() {
        let a = system("a");
        let stranger = system("stranger");
        let mut schedule = Schedule::new();
        schedule.add_system(a.clone());

        assert!(schedule.contains(a.id()));
        assert_eq!(schedule.get(a.id()).map(SystemDescriptor::name), Some("a"));
        assert!(!schedule.contains(stranger.id()));
        assert!(schedule.get(stranger.id()).is_none());
        assert_eq!(schedule.position(stranger.id()), None);
    }

    #[test]
    fn swap_only_moves_the_order() {
        let (a, b) = (system("a"), system("b"));
        let mut schedule = Schedule::new();
        schedule.add_system(a.clone());
        schedule.add_system(b.clone());

        schedule.swap(0, 1);

        assert_eq!(schedule.names(), vec!["b", "a"]);
        assert!(schedule.contains(a.id()) && schedule.contains(b.id()));
    }

    #[test]
    fn error_messages_name_the_culprit() {
        let err = ScheduleError::ResourceNotFound {
            system: "after_execute",
            resource: "greeter::Iam",
        };
        assert_eq!(
            err.to_string(),
            "resource of type greeter::Iam not found (required by `after_execute`)"
        );

        let err = ScheduleError::UnresolvedDependencies { system: "lazy" };
        assert!(err.to_string().contains("`lazy`"));
    }
}
