//! Structured logging setup.
//!
//! Installs a `tracing` subscriber with an environment filter and either a
//! human-readable or a JSON formatter.

use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines
    pub json: bool,
    /// Include source file and line in each event
    pub with_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create a configuration with the given default level
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Switch to JSON output
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Include source locations
    #[must_use]
    pub fn with_location(mut self, with_location: bool) -> Self {
        self.with_location = with_location;
        self
    }

    /// Filter to install: `RUST_LOG` when set, the configured level otherwise
    ///
    /// # Errors
    /// Returns error if the configured level is not a valid filter directive
    pub fn filter(&self) -> Result<EnvFilter, TelemetryError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| TelemetryError::Filter(format!("{}: {e}", self.level))),
        }
    }
}

/// Initialize the global subscriber.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// # Errors
/// Returns error if the filter is invalid or a subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = config.filter()?;

    let fmt_layer = if config.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.with_location)
            .with_line_number(config.with_location)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.with_location)
            .with_line_number(config.with_location)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}

/// Telemetry setup error
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to install the subscriber
    #[error("Failed to initialize logging: {0}")]
    Init(String),
    /// Invalid filter directive
    #[error("Invalid log filter: {0}")]
    Filter(String),
    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(String),
}
