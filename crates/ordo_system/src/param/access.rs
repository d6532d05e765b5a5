//! Dependency descriptors.
//!
//! A system names the resources it needs as an ordered list of
//! [`Dependency`] values. Position in the list is the injection position:
//! the first dependency is argument `0`, the second argument `1`, and so on.
//!
//! Dependencies are built from [`ResourceKey`]s with [`read`] and [`write`]:
//!
//! ```
//! use ordo_system::param::{read, write, IntoDependencies};
//! use ordo_system::resource::Resources;
//!
//! #[derive(Default)]
//! struct Config;
//! #[derive(Default)]
//! struct Counter;
//!
//! let mut resources = Resources::new();
//! let config = resources.declare::<Config>();
//! let counter = resources.declare::<Counter>();
//!
//! let deps = (read(config), write(counter)).into_dependencies();
//! assert_eq!(deps[0].id, config.id());
//! assert_eq!(deps[1].id, counter.id());
//! ```

use variadics_please::all_tuples;

use crate::resource::{Resource, ResourceId, ResourceKey};

/// The mode of access to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Read-only access.
    Read,
    /// Read-write access.
    Write,
}

/// One entry of a system's dependency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Identity of the required resource.
    pub id: ResourceId,
    /// Declared type name, reported when the resource is missing.
    pub type_name: &'static str,
    /// How the system accesses the resource.
    pub mode: AccessMode,
}

impl Dependency {
    /// Creates a dependency on `key` with the given access mode.
    #[must_use]
    pub fn new<T: Resource>(key: ResourceKey<T>, mode: AccessMode) -> Self {
        Self {
            id: key.id(),
            type_name: key.type_name(),
            mode,
        }
    }
}

/// Declares read-only access to a resource.
#[must_use]
pub fn read<T: Resource>(key: ResourceKey<T>) -> Dependency {
    Dependency::new(key, AccessMode::Read)
}

/// Declares read-write access to a resource.
#[must_use]
pub fn write<T: Resource>(key: ResourceKey<T>) -> Dependency {
    Dependency::new(key, AccessMode::Write)
}

/// Types that can be turned into an ordered dependency list.
///
/// Implemented for a single [`Dependency`], `Vec<Dependency>`, the unit type
/// (the explicit empty list), and tuples of up to 16 elements.
pub trait IntoDependencies {
    /// Returns the dependencies in declaration order.
    fn into_dependencies(self) -> Vec<Dependency>;
}

impl IntoDependencies for Dependency {
    fn into_dependencies(self) -> Vec<Dependency> {
        vec![self]
    }
}

impl IntoDependencies for Vec<Dependency> {
    fn into_dependencies(self) -> Vec<Dependency> {
        self
    }
}

impl IntoDependencies for () {
    fn into_dependencies(self) -> Vec<Dependency> {
        Vec::new()
    }
}

macro_rules! impl_into_dependencies_for_tuple {
    ($($D:ident),*) => {
        impl<$($D: IntoDependencies),*> IntoDependencies for ($($D,)*) {
            #[expect(non_snake_case, reason = "tuple elements are bound by their type names")]
            fn into_dependencies(self) -> Vec<Dependency> {
                let ($($D,)*) = self;
                core::iter::empty()
                    $(.chain($D.into_dependencies()))*
                    .collect()
            }
        }
    };
}

all_tuples!(impl_into_dependencies_for_tuple, 1, 16, D);
