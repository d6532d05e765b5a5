//! Resource storage and management.
//!
//! This module provides the [`Resource`] trait, the [`ResourceId`] and
//! [`ResourceKey`] identities, and the [`Resources`] container that owns every
//! declared resource instance.
//!
//! # Identity
//!
//! Every declaration allocates a fresh [`ResourceId`]. Declaring the same type
//! twice yields two distinct identities and two distinct instances; the store
//! never deduplicates by type. Systems name the resources they need by
//! identity, not by type.

use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A value that can be stored in [`Resources`] and injected into systems.
///
/// Any type that is `Send + Sync + 'static` automatically implements
/// `Resource`.
pub trait Resource: Send + Sync + 'static {
    /// Returns the type name for debugging purposes.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Send + Sync + 'static> Resource for T {}

/// Process-wide counter backing [`ResourceId`] allocation.
static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a declared resource.
///
/// Identities are unique for the lifetime of the process, across every
/// [`Resources`] container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Allocates the next unique resource identity.
    #[must_use]
    pub fn allocate() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource_{}", self.0)
    }
}

/// Typed handle to a declared resource.
///
/// Returned by [`Resources::declare`] and friends. The key carries the
/// resource's identity together with its type, so dependency declarations
/// and lookups can report the declared type name.
pub struct ResourceKey<T: Resource> {
    id: ResourceId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> ResourceKey<T> {
    fn new(id: ResourceId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the identity this key refers to.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Returns the declared type name of the resource.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }
}

impl<T: Resource> Clone for ResourceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Resource> Copy for ResourceKey<T> {}

impl<T: Resource> PartialEq for ResourceKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: Resource> Eq for ResourceKey<T> {}

impl<T: Resource> Hash for ResourceKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: Resource> fmt::Debug for ResourceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceKey")
            .field("id", &self.id)
            .field("type", &self.type_name())
            .finish()
    }
}

/// Errors that can occur during resource operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// No resource is stored under the requested identity.
    #[error("resource of type {0} not found")]
    NotFound(&'static str),

    /// The resource is currently borrowed in a conflicting way.
    #[error("resource already borrowed: {0}")]
    BorrowConflict(&'static str),

    /// The stored instance has a different type than the one requested.
    #[error("resource type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the caller asked for.
        expected: &'static str,
        /// The type actually stored under the identity.
        found: &'static str,
    },
}

/// Internal storage for a single resource instance.
pub(crate) struct ResourceEntry {
    type_name: &'static str,
    data: RwLock<Box<dyn Any + Send + Sync>>,
}

impl ResourceEntry {
    fn new<T: Resource>(resource: T) -> Self {
        Self {
            type_name: core::any::type_name::<T>(),
            data: RwLock::new(Box::new(resource)),
        }
    }

    /// Returns the type name recorded at declaration.
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Acquires shared access, checking the stored type.
    pub(crate) fn read<T: Resource>(&self) -> Result<ResourceRef<'_, T>, ResourceError> {
        let expected = core::any::type_name::<T>();
        let guard = self
            .data
            .try_read()
            .ok_or(ResourceError::BorrowConflict(expected))?;

        if !guard.is::<T>() {
            return Err(ResourceError::TypeMismatch {
                expected,
                found: self.type_name,
            });
        }

        Ok(ResourceRef {
            guard,
            _marker: PhantomData,
        })
    }

    /// Acquires exclusive access, checking the stored type.
    pub(crate) fn write<T: Resource>(&self) -> Result<ResourceRefMut<'_, T>, ResourceError> {
        let expected = core::any::type_name::<T>();
        let guard = self
            .data
            .try_write()
            .ok_or(ResourceError::BorrowConflict(expected))?;

        if !guard.is::<T>() {
            return Err(ResourceError::TypeMismatch {
                expected,
                found: self.type_name,
            });
        }

        Ok(ResourceRefMut {
            guard,
            _marker: PhantomData,
        })
    }
}

/// The resource store: one instance per [`ResourceId`].
///
/// `Resources` is created explicitly, usually once at process start, and
/// passed by reference to [`Scheduler::run`](crate::scheduler::Scheduler::run).
/// It is the sole long-term owner of every instance; systems only ever see
/// RAII guards for the duration of a call.
///
/// # Example
///
/// ```
/// use ordo_system::resource::Resources;
///
/// #[derive(Default)]
/// struct Counter { value: i32 }
///
/// let mut resources = Resources::new();
/// let counter = resources.declare::<Counter>();
///
/// resources.get_mut(&counter).unwrap().value += 1;
/// assert_eq!(resources.get(&counter).unwrap().value, 1);
/// ```
#[derive(Default)]
pub struct Resources {
    storage: HashMap<ResourceId, ResourceEntry>,
}

impl Resources {
    /// Creates a new empty resource store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Declares a resource type, instantiating it with [`Default`].
    ///
    /// A fresh identity is assigned on every call, so declaring the same type
    /// twice produces two independent instances.
    pub fn declare<T: Resource + Default>(&mut self) -> ResourceKey<T> {
        self.insert(T::default())
    }

    /// Declares a resource whose construction may fail.
    ///
    /// Nothing is stored when `init` returns an error.
    ///
    /// # Errors
    ///
    /// Returns whatever error `init` produced.
    pub fn try_declare_with<T, E, F>(&mut self, init: F) -> Result<ResourceKey<T>, E>
    where
        T: Resource,
        F: FnOnce() -> Result<T, E>,
    {
        init().map(|resource| self.insert(resource))
    }

    /// Stores an already-constructed resource under a fresh identity.
    pub fn insert<T: Resource>(&mut self, resource: T) -> ResourceKey<T> {
        let key = ResourceKey::new(ResourceId::allocate());
        self.storage.insert(key.id(), ResourceEntry::new(resource));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            resource = %key.id(),
            type_name = key.type_name(),
            "declared resource"
        );

        key
    }

    /// Returns `true` if a resource is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: ResourceId) -> bool {
        self.storage.contains_key(&id)
    }

    /// Returns the declared type name of the resource stored under `id`.
    #[must_use]
    pub fn type_name(&self, id: ResourceId) -> Option<&'static str> {
        self.storage.get(&id).map(ResourceEntry::type_name)
    }

    /// Gets shared access to a resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if the key was declared in another store
    /// - [`ResourceError::BorrowConflict`] if the resource is mutably borrowed
    pub fn get<T: Resource>(
        &self,
        key: &ResourceKey<T>,
    ) -> Result<ResourceRef<'_, T>, ResourceError> {
        self.get_by_id(key.id())
    }

    /// Gets exclusive access to a resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if the key was declared in another store
    /// - [`ResourceError::BorrowConflict`] if the resource is already borrowed
    pub fn get_mut<T: Resource>(
        &self,
        key: &ResourceKey<T>,
    ) -> Result<ResourceRefMut<'_, T>, ResourceError> {
        self.get_mut_by_id(key.id())
    }

    /// Gets shared access to the resource stored under a raw identity.
    ///
    /// # Errors
    ///
    /// Fails like [`get`](Self::get), and additionally with
    /// [`ResourceError::TypeMismatch`] if `T` is not the stored type.
    pub fn get_by_id<T: Resource>(
        &self,
        id: ResourceId,
    ) -> Result<ResourceRef<'_, T>, ResourceError> {
        self.entry(id)
            .ok_or(ResourceError::NotFound(core::any::type_name::<T>()))?
            .read()
    }

    /// Gets exclusive access to the resource stored under a raw identity.
    ///
    /// # Errors
    ///
    /// Fails like [`get_mut`](Self::get_mut), and additionally with
    /// [`ResourceError::TypeMismatch`] if `T` is not the stored type.
    pub fn get_mut_by_id<T: Resource>(
        &self,
        id: ResourceId,
    ) -> Result<ResourceRefMut<'_, T>, ResourceError> {
        self.entry(id)
            .ok_or(ResourceError::NotFound(core::any::type_name::<T>()))?
            .write()
    }

    pub(crate) fn entry(&self, id: ResourceId) -> Option<&ResourceEntry> {
        self.storage.get(&id)
    }

    /// Returns the number of resources stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if no resources are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.storage.iter().map(|(id, entry)| (id, entry.type_name)))
            .finish()
    }
}

/// RAII guard for shared resource access.
///
/// The lock is released when the guard is dropped.
pub struct ResourceRef<'a, T: Resource> {
    guard: RwLockReadGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: PhantomData<&'a T>,
}

impl<T: Resource> core::ops::Deref for ResourceRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // The stored type was checked when the guard was created.
        self.guard
            .downcast_ref::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}

/// RAII guard for exclusive resource access.
///
/// The lock is released when the guard is dropped.
pub struct ResourceRefMut<'a, T: Resource> {
    guard: RwLockWriteGuard<'a, Box<dyn Any + Send + Sync>>,
    _marker: PhantomData<&'a mut T>,
}

impl<T: Resource> core::ops::Deref for ResourceRefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.guard
            .downcast_ref::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}

impl<T: Resource> core::ops::DerefMut for ResourceRefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
            .downcast_mut::<T>()
            .expect("resource type mismatch (this is a bug)")
    }
}
