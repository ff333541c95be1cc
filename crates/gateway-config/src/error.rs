//! Configuration error types.

use std::path::PathBuf;

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse config file {path}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The file extension names no supported format.
    #[error("Unsupported config format for {0} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(PathBuf),

    /// A provider name did not match any supported vendor.
    #[error("Unknown provider '{0}' (expected cerebras, gemini or openai)")]
    UnknownProvider(String),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Validation(String),
}
