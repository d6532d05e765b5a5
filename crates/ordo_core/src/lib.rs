//! Ambient infrastructure for ordo applications.
//!
//! - [`TracingConfig`] - Installs the global `tracing` subscriber
//! - [`TracingInfo`] - Resource describing the installed configuration
//!
//! Library crates only emit events (`ordo_system` behind its `tracing`
//! feature); binaries decide where they go by installing a subscriber here.
//!
//! # Example
//!
//! ```
//! use ordo_core::TracingConfig;
//! use tracing::Level;
//!
//! TracingConfig::new().with_level(Level::WARN).init().unwrap();
//! ```

mod tracing_config;

pub use tracing_config::{TracingConfig, TracingError, TracingFormat, TracingInfo};
