//! Resource injection.
//!
//! Before a system runs, the scheduler resolves each entry of its dependency
//! list against the [`Resources`] store and hands the system a
//! [`SystemArgs`]: the resolved resources, in declared order. The system
//! body then borrows them by position.
//!
//! # Example
//!
//! ```
//! use ordo_system::param::{read, write, SystemArgs};
//! use ordo_system::resource::Resources;
//!
//! #[derive(Default)]
//! struct Step(u32);
//! #[derive(Default)]
//! struct Total(u32);
//!
//! let mut resources = Resources::new();
//! let step = resources.declare::<Step>();
//! let total = resources.declare::<Total>();
//!
//! let deps = [read(step), write(total)];
//! let args = SystemArgs::resolve("accumulate", &deps, &resources).unwrap();
//!
//! let step = args.res::<Step>(0).unwrap();
//! args.res_mut::<Total>(1).unwrap().0 += step.0 + 1;
//! ```

mod access;

pub use access::{AccessMode, Dependency, IntoDependencies, read, write};

use crate::resource::{
    Resource, ResourceEntry, ResourceError, ResourceRef, ResourceRefMut, Resources,
};

/// Errors that can occur when resolving or borrowing injected resources.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// A declared dependency has no entry in the store.
    #[error("resource of type {0} not found")]
    ResourceNotFound(&'static str),

    /// The resource is already borrowed in a conflicting way.
    #[error("borrow conflict: {0}")]
    BorrowConflict(&'static str),

    /// The requested type does not match the resource at that position.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the system asked for.
        expected: &'static str,
        /// The type declared for the resource.
        found: &'static str,
    },

    /// The system asked for a position past the end of its dependency list.
    #[error("no resource injected at position {0}")]
    MissingArgument(usize),

    /// Mutable access was requested for a dependency declared read-only.
    #[error("resource {type_name} at position {index} was declared read-only")]
    ReadOnly {
        /// Position in the dependency list.
        index: usize,
        /// Declared type name.
        type_name: &'static str,
    },
}

impl From<ResourceError> for ParamError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(name) => ParamError::ResourceNotFound(name),
            ResourceError::BorrowConflict(name) => ParamError::BorrowConflict(name),
            ResourceError::TypeMismatch { expected, found } => {
                ParamError::TypeMismatch { expected, found }
            }
        }
    }
}

struct Slot<'w> {
    dependency: &'w Dependency,
    entry: &'w ResourceEntry,
}

/// The resolved resources handed to a running system.
///
/// Positions follow the system's declared dependency list. Borrows go
/// through the store's locks, so asking for the same resource mutably twice
/// at once fails with [`ParamError::BorrowConflict`] instead of aliasing.
pub struct SystemArgs<'w> {
    system: &'static str,
    slots: Vec<Slot<'w>>,
}

impl<'w> SystemArgs<'w> {
    /// Resolves `dependencies` against `resources`, in order.
    ///
    /// Resolution stops at the first dependency with no entry in the store.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::ResourceNotFound`] naming the declared type of
    /// the first missing resource.
    pub fn resolve(
        system: &'static str,
        dependencies: &'w [Dependency],
        resources: &'w Resources,
    ) -> Result<Self, ParamError> {
        let slots = dependencies
            .iter()
            .map(|dependency| {
                resources
                    .entry(dependency.id)
                    .map(|entry| Slot { dependency, entry })
                    .ok_or(ParamError::ResourceNotFound(dependency.type_name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { system, slots })
    }

    /// Returns the name of the system these arguments were resolved for.
    #[must_use]
    pub fn system(&self) -> &'static str {
        self.system
    }

    /// Returns the number of injected resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the system declared no dependencies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the dependency declared at `index`.
    #[must_use]
    pub fn dependency(&self, index: usize) -> Option<&'w Dependency> {
        self.slots.get(index).map(|slot| slot.dependency)
    }

    /// Borrows the resource at `index` immutably.
    ///
    /// # Errors
    ///
    /// - [`ParamError::MissingArgument`] if `index` is out of range
    /// - [`ParamError::TypeMismatch`] if `T` is not the declared type
    /// - [`ParamError::BorrowConflict`] if the resource is mutably borrowed
    pub fn res<T: Resource>(&self, index: usize) -> Result<ResourceRef<'w, T>, ParamError> {
        let slot = self.slot(index)?;
        Ok(slot.entry.read::<T>()?)
    }

    /// Borrows the resource at `index` mutably.
    ///
    /// # Errors
    ///
    /// Fails like [`res`](Self::res), and with [`ParamError::ReadOnly`] if
    /// the dependency was declared with [`read`].
    pub fn res_mut<T: Resource>(
        &self,
        index: usize,
    ) -> Result<ResourceRefMut<'w, T>, ParamError> {
        let slot = self.slot(index)?;
        if slot.dependency.mode == AccessMode::Read {
            return Err(ParamError::ReadOnly {
                index,
                type_name: slot.dependency.type_name,
            });
        }
        Ok(slot.entry.write::<T>()?)
    }

    fn slot(&self, index: usize) -> Result<&Slot<'w>, ParamError> {
        self.slots.get(index).ok_or(ParamError::MissingArgument(index))
    }
}

impl core::fmt::Debug for SystemArgs<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SystemArgs")
            .field("system", &self.system)
            .field(
                "dependencies",
                &self.slots.iter().map(|slot| slot.dependency).collect::<Vec<_>>(),
            )
            .finish()
    }
}
