//! Resource storage.
//!
//! - [`Resources`] - The resource store, one instance per identity
//! - [`ResourceId`] - Opaque, process-wide unique resource identity
//! - [`ResourceKey`] - Typed handle returned when a resource is declared
//! - [`ResourceRef`] / [`ResourceRefMut`] - RAII access guards
//!
//! # Example
//!
//! ```
//! use ordo_system::resource::Resources;
//!
//! #[derive(Default)]
//! struct Iam;
//!
//! let mut resources = Resources::new();
//! let first = resources.declare::<Iam>();
//! let second = resources.declare::<Iam>();
//!
//! // No deduplication by type.
//! assert_ne!(first.id(), second.id());
//! ```

#[expect(
    clippy::module_inception,
    reason = "resource.rs contains the core Resource trait and Resources container logic"
)]
mod resource;

pub(crate) use resource::ResourceEntry;
pub use resource::{
    Resource, ResourceError, ResourceId, ResourceKey, ResourceRef, ResourceRefMut, Resources,
};
