//! System declaration.
//!
//! A system is a unit of work together with the metadata the scheduler needs
//! to place and run it:
//!
//! - a unique [`SystemId`], assigned when the descriptor is built
//! - an ordered dependency list naming the resources to inject
//! - a list of ordering directives ([`Priority`]) applied at build time
//!
//! Descriptors are declared explicitly through [`SystemDescriptor::builder`].
//! There is no inference of dependencies from parameter types: the author
//! lists them, and positions in that list are the positions the body reads
//! from [`SystemArgs`].
//!
//! # Example
//!
//! ```
//! use ordo_system::param::read;
//! use ordo_system::resource::Resources;
//! use ordo_system::system::SystemDescriptor;
//!
//! #[derive(Default)]
//! struct Greeting(String);
//!
//! let mut resources = Resources::new();
//! let greeting = resources.declare::<Greeting>();
//!
//! let setup = SystemDescriptor::builder("setup")
//!     .dependencies(())
//!     .build(|_| Ok(()));
//!
//! let greet = SystemDescriptor::builder("greet")
//!     .after(&setup)
//!     .dependencies(read(greeting))
//!     .build(|args| {
//!         let greeting = args.res::<Greeting>(0)?;
//!         assert!(greeting.0.is_empty());
//!         Ok(())
//!     });
//!
//! assert_eq!(greet.priorities().len(), 1);
//! assert_eq!(greet.dependencies().map(<[_]>::len), Some(1));
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::param::{Dependency, IntoDependencies, ParamError, SystemArgs};
use crate::schedule::{IntoPriorities, Priority, after};

/// Errors returned by a system body.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// Borrowing an injected resource failed.
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// The system encountered an error during execution.
    #[error("execution error: {0}")]
    Execution(String),
}

/// Process-wide counter backing [`SystemId`] allocation.
static NEXT_SYSTEM_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a declared system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(u64);

impl SystemId {
    /// Allocates the next unique system identity.
    #[must_use]
    pub fn allocate() -> Self {
        Self(NEXT_SYSTEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system_{}", self.0)
    }
}

/// Shared, type-erased system body.
pub type SystemFn = Arc<dyn Fn(&SystemArgs<'_>) -> Result<(), SystemError> + Send + Sync>;

/// Everything the scheduler knows about one system.
///
/// Cloning is cheap and keeps the identity: every clone refers to the same
/// system.
#[derive(Clone)]
pub struct SystemDescriptor {
    id: SystemId,
    name: &'static str,
    dependencies: Option<Vec<Dependency>>,
    priorities: Vec<Priority>,
    func: SystemFn,
}

impl SystemDescriptor {
    /// Starts declaring a new system.
    #[must_use]
    pub fn builder(name: &'static str) -> SystemBuilder {
        SystemBuilder::new(name)
    }

    /// Returns the system's identity.
    #[must_use]
    pub fn id(&self) -> SystemId {
        self.id
    }

    /// Returns the system's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared dependency list, or `None` if it was never
    /// declared.
    #[must_use]
    pub fn dependencies(&self) -> Option<&[Dependency]> {
        self.dependencies.as_deref()
    }

    /// Returns `true` if the dependency list was declared (possibly empty).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.dependencies.is_some()
    }

    /// Returns the ordering directives attached at declaration.
    #[must_use]
    pub fn priorities(&self) -> &[Priority] {
        &self.priorities
    }

    /// Invokes the system body with already-resolved arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever the body returns.
    pub fn call(&self, args: &SystemArgs<'_>) -> Result<(), SystemError> {
        (self.func)(args)
    }
}

impl fmt::Debug for SystemDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("priorities", &self.priorities)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SystemDescriptor`].
///
/// The dependency list starts out undeclared. Call
/// [`dependencies`](Self::dependencies) at least once (with `()` for a system
/// that needs nothing); the scheduler rejects descriptors whose list was
/// never declared.
#[must_use]
pub struct SystemBuilder {
    name: &'static str,
    dependencies: Option<Vec<Dependency>>,
    priorities: Vec<Priority>,
}

impl SystemBuilder {
    /// Creates a builder for a system called `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            dependencies: None,
            priorities: Vec::new(),
        }
    }

    /// Adds an [`after`] directive: this system runs after `target`.
    pub fn after(mut self, target: &SystemDescriptor) -> Self {
        self.priorities.push(after(target));
        self
    }

    /// Adds ordering directives, kept in the given order.
    pub fn priorities(mut self, priorities: impl IntoPriorities) -> Self {
        self.priorities.extend(priorities.into_priorities());
        self
    }

    /// Declares (or extends) the positional dependency list.
    pub fn dependencies(mut self, dependencies: impl IntoDependencies) -> Self {
        self.dependencies
            .get_or_insert_with(Vec::new)
            .extend(dependencies.into_dependencies());
        self
    }

    /// Finishes the declaration, assigning a fresh [`SystemId`].
    pub fn build<F>(self, func: F) -> SystemDescriptor
    where
        F: Fn(&SystemArgs<'_>) -> Result<(), SystemError> + Send + Sync + 'static,
    {
        SystemDescriptor {
            id: SystemId::allocate(),
            name: self.name,
            dependencies: self.dependencies,
            priorities: self.priorities,
            func: Arc::new(func),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{read, write};
    use crate::resource::Resources;

    #[derive(Debug, Default)]
    struct Counter {
        value: i32,
    }

    #[test]
    fn build_assigns_fresh_ids() {
        let a = SystemDescriptor::builder("a").dependencies(()).build(|_| Ok(()));
        let b = SystemDescriptor::builder("a").dependencies(()).build(|_| Ok(()));

        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn clone_keeps_identity() {
        let a = SystemDescriptor::builder("a").dependencies(()).build(|_| Ok(()));
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn undeclared_dependencies_are_unresolved() {
        let system = SystemDescriptor::builder("lazy").build(|_| Ok(()));

        assert!(!system.is_resolved());
        assert!(system.dependencies().is_none());
    }

    #[test]
    fn unit_dependencies_are_resolved_and_empty() {
        let system = SystemDescriptor::builder("noop").dependencies(()).build(|_| Ok(()));

        assert!(system.is_resolved());
        assert_eq!(system.dependencies(), Some(&[][..]));
    }

    #[test]
    fn dependencies_accumulate_in_order() {
        let mut resources = Resources::new();
        let first = resources.declare::<Counter>();
        let second = resources.declare::<Counter>();

        let system = SystemDescriptor::builder("pair")
            .dependencies(read(first))
            .dependencies(write(second))
            .build(|_| Ok(()));

        let ids: Vec<_> = system
            .dependencies()
            .unwrap()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn after_records_target() {
        let target = SystemDescriptor::builder("target").dependencies(()).build(|_| Ok(()));
        let system = SystemDescriptor::builder("follower")
            .after(&target)
            .dependencies(())
            .build(|_| Ok(()));

        assert_eq!(system.priorities().len(), 1);
        assert_eq!(system.priorities()[0].target(), target.id());
    }

    #[test]
    fn call_runs_body_with_args() {
        let mut resources = Resources::new();
        let counter = resources.declare::<Counter>();

        let system = SystemDescriptor::builder("increment")
            .dependencies(write(counter))
            .build(|args| {
                args.res_mut::<Counter>(0)?.value += 1;
                Ok(())
            });

        let deps = system.dependencies().unwrap();
        let args = SystemArgs::resolve(system.name(), deps, &resources).unwrap();
        system.call(&args).unwrap();
        system.call(&args).unwrap();
        drop(args);

        assert_eq!(resources.get(&counter).unwrap().value, 2);
    }

    #[test]
    fn body_errors_are_returned() {
        let system = SystemDescriptor::builder("fails")
            .dependencies(())
            .build(|_| Err(SystemError::Execution("nope".into())));

        let resources = Resources::new();
        let args = SystemArgs::resolve(system.name(), &[], &resources).unwrap();

        let err = system.call(&args).unwrap_err();
        assert_eq!(err.to_string(), "execution error: nope");
    }

    #[test]
    fn system_id_display() {
        assert_eq!(SystemId(3).to_string(), "system_3");
    }
}
