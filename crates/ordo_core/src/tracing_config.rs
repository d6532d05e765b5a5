//! Logging setup.
//!
//! Provides [`TracingConfig`], which installs a global `tracing` subscriber,
//! and [`TracingInfo`], a resource describing the installed configuration so
//! systems can adapt their logging.
//!
//! # Example
//!
//! ```
//! use ordo_core::{TracingConfig, TracingFormat, TracingInfo};
//! use ordo_system::param::read;
//! use ordo_system::resource::Resources;
//! use ordo_system::system::SystemDescriptor;
//! use tracing::Level;
//!
//! let mut resources = Resources::new();
//! let info = TracingConfig::default()
//!     .with_level(Level::DEBUG)
//!     .with_format(TracingFormat::Compact)
//!     .install(&mut resources)
//!     .unwrap();
//!
//! let report = SystemDescriptor::builder("report")
//!     .dependencies(read(info))
//!     .build(|args| {
//!         let info = args.res::<TracingInfo>(0)?;
//!         if info.level >= Level::DEBUG {
//!             tracing::debug!(format = ?info.format, "debug output enabled");
//!         }
//!         Ok(())
//!     });
//! # let _ = report;
//! ```

use ordo_system::resource::{ResourceKey, Resources};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The environment filter string could not be parsed.
    #[error("invalid tracing filter: {0}")]
    InvalidFilter(#[from] ParseError),
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingInfo Resource
// ─────────────────────────────────────────────────────────────────────────────

/// The configuration a subscriber was installed with.
///
/// Declared into the store by [`TracingConfig::install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingInfo {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for the global `tracing` subscriber.
///
/// The subscriber is a [`tracing_subscriber`] registry with an [`EnvFilter`]
/// and a formatting layer. Installing twice is harmless: only the first
/// subscriber takes effect.
///
/// # Configuration Options
///
/// ```
/// use ordo_core::{TracingConfig, TracingFormat};
/// use tracing::Level;
///
/// // Development: pretty output with span enter/exit
/// let dev = TracingConfig::default()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // Production: JSON with per-target levels
/// let prod = TracingConfig::default()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("ordo_system=info,greeter=debug");
/// # let _ = (dev, prod);
/// ```
#[derive(Debug, Clone)]
pub struct TracingConfig {
    level: Level,
    format: TracingFormat,
    /// Overrides `level` when set, e.g. `"ordo_system=debug,greeter=info"`.
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configuration as a [`TracingInfo`].
    #[must_use]
    pub fn info(&self) -> TracingInfo {
        TracingInfo {
            level: self.level,
            format: self.format,
        }
    }

    fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::new(self.level.as_str())),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Does nothing if a global subscriber is already installed.
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::InvalidFilter`] if the environment filter
    /// cannot be parsed. Nothing is installed in that case.
    pub fn init(&self) -> Result<(), TracingError> {
        let env_filter = self.env_filter()?;

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init().ok(): an earlier subscriber stays in place.
        match self.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::info!(
            level = %self.level,
            format = ?self.format,
            "tracing initialized"
        );

        Ok(())
    }

    /// Installs the global subscriber and declares a [`TracingInfo`]
    /// resource describing it.
    ///
    /// # Errors
    ///
    /// Fails like [`init`](Self::init). Nothing is declared on error.
    pub fn install(
        &self,
        resources: &mut Resources,
    ) -> Result<ResourceKey<TracingInfo>, TracingError> {
        self.init()?;
        Ok(resources.insert(self.info()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_format_default_is_pretty() {
        assert_eq!(TracingFormat::default(), TracingFormat::Pretty);
    }

    #[test]
    fn tracing_config_default_level_is_info() {
        let config = TracingConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.span_events);
    }

    #[test]
    fn tracing_config_builders() {
        let config = TracingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(TracingFormat::Json)
            .with_env_filter("ordo_system=debug")
            .with_span_events(true);

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, TracingFormat::Json);
        assert_eq!(config.env_filter.as_deref(), Some("ordo_system=debug"));
        assert!(config.span_events);
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let config = TracingConfig::new().with_env_filter("ordo_system=notalevel");
        let mut resources = Resources::new();

        assert!(matches!(
            config.install(&mut resources),
            Err(TracingError::InvalidFilter(_))
        ));
        assert!(resources.is_empty());
    }

    #[test]
    fn install_declares_info_and_is_repeatable() {
        let config = TracingConfig::new().with_format(TracingFormat::Compact);
        let mut resources = Resources::new();

        let first = config.install(&mut resources).unwrap();
        let second = config.install(&mut resources).unwrap();

        assert_ne!(first, second);
        assert_eq!(*resources.get(&first).unwrap(), config.info());
        assert_eq!(resources.get(&second).unwrap().format, TracingFormat::Compact);
    }
}
