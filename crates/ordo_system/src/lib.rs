//! Resources, systems and the linear scheduler for ordo.
//!
//! `ordo_system` provides the primitives for running a fixed set of systems
//! once, in a single order, against a shared store of resources:
//!
//! - [`resource`] - Type-erased resource store with per-declaration identities
//! - [`param`] - Dependency lists and resource injection
//! - [`mod@system`] - System descriptors and their builder
//! - [`schedule`] - The ordered sequence and the [`after`](schedule::after) directive
//! - [`scheduler`] - Register, build and run
//! - [`module`] - Grouping systems for registration
//!
//! # Example
//!
//! ```
//! use ordo_system::prelude::*;
//!
//! #[derive(Default)]
//! struct Iam;
//!
//! impl Iam {
//!     fn echo(&self) -> &'static str {
//!         "iam echo"
//!     }
//! }
//!
//! let mut resources = Resources::new();
//! let iam = resources.declare::<Iam>();
//!
//! let execute = SystemDescriptor::builder("execute")
//!     .dependencies(())
//!     .build(|_| Ok(()));
//! let after_execute = SystemDescriptor::builder("after_execute")
//!     .after(&execute)
//!     .dependencies(read(iam))
//!     .build(|args| {
//!         assert_eq!(args.res::<Iam>(0)?.echo(), "iam echo");
//!         Ok(())
//!     });
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register(&[after_execute, execute])?;
//! scheduler.build()?;
//! scheduler.run(&resources)?;
//!
//! assert_eq!(scheduler.schedule().names(), vec!["execute", "after_execute"]);
//! # Ok::<(), ScheduleError>(())
//! ```

/// Grouping systems for registration.
pub mod module;

/// Dependency lists and resource injection.
pub mod param;

/// Resource store management.
pub mod resource;

/// The ordered sequence of systems.
pub mod schedule;

/// Registration, build and run.
pub mod scheduler;

/// System descriptors.
pub mod system;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::module::*;
    pub use crate::param::*;
    pub use crate::resource::*;
    pub use crate::schedule::*;
    pub use crate::scheduler::*;
    pub use crate::system::*;
}
