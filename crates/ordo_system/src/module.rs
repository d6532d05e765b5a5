//! Grouping systems for registration.
//!
//! A [`Module`] is anything that can list a set of systems. The scheduler
//! registers all of them at once through
//! [`Scheduler::register`](crate::scheduler::Scheduler::register).
//!
//! # Example
//!
//! ```
//! use ordo_system::module::Module;
//! use ordo_system::scheduler::Scheduler;
//! use ordo_system::system::SystemDescriptor;
//!
//! struct Setup {
//!     load: SystemDescriptor,
//!     check: SystemDescriptor,
//! }
//!
//! impl Setup {
//!     fn new() -> Self {
//!         let load = SystemDescriptor::builder("load").dependencies(()).build(|_| Ok(()));
//!         let check = SystemDescriptor::builder("check")
//!             .after(&load)
//!             .dependencies(())
//!             .build(|_| Ok(()));
//!         Self { load, check }
//!     }
//! }
//!
//! impl Module for Setup {
//!     fn systems(&self) -> Vec<SystemDescriptor> {
//!         vec![self.check.clone(), self.load.clone()]
//!     }
//! }
//!
//! let mut scheduler = Scheduler::new();
//! assert_eq!(scheduler.register(&Setup::new()).unwrap(), 2);
//! ```

use crate::system::SystemDescriptor;

/// A named group of systems.
///
/// Implementations should return the same descriptors (the same identities)
/// on every call, so that registering a module twice adds nothing the second
/// time. Keep the descriptors in the module and hand out clones.
///
/// There is no per-module setup hook. Resources are declared on a
/// [`Resources`](crate::resource::Resources) store before the module's
/// systems are built, so a module has nothing left to configure when it is
/// registered.
pub trait Module: Send + Sync + 'static {
    /// Returns the module's systems in registration order.
    fn systems(&self) -> Vec<SystemDescriptor>;

    /// Returns the module's name for debugging and error messages.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl Module for Vec<SystemDescriptor> {
    fn systems(&self) -> Vec<SystemDescriptor> {
        self.clone()
    }
}

impl<const N: usize> Module for [SystemDescriptor; N] {
    fn systems(&self) -> Vec<SystemDescriptor> {
        self.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl Module for Empty {
        fn systems(&self) -> Vec<SystemDescriptor> {
            Vec::new()
        }
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Empty.name().ends_with("Empty"));
    }

    #[test]
    fn collections_keep_identities() {
        let a = SystemDescriptor::builder("a").dependencies(()).build(|_| Ok(()));
        let b = SystemDescriptor::builder("b").dependencies(()).build(|_| Ok(()));

        let array = [a.clone(), b.clone()];
        let ids: Vec<_> = array.systems().iter().map(SystemDescriptor::id).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);

        let list = vec![b.clone(), a.clone()];
        let ids: Vec<_> = list.systems().iter().map(SystemDescriptor::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
    }
}
