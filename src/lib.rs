//! A minimal resource store and linear system scheduler.
//!

pub use ordo_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use ordo_internal::prelude::*;
}
