//! # Ordo Internal Library
//!
//! Re-exports the ordo crates for convenience.

/// Resources, systems and the scheduler.
pub use ordo_system;

/// Logging setup.
pub use ordo_core;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use ordo_core::{TracingConfig, TracingFormat, TracingInfo};
    pub use ordo_system::prelude::*;
}
