//! # Gateway Config
//!
//! Configuration for the inference gateway.
//!
//! Values are layered, later sources winning:
//! - Built-in defaults
//! - A YAML or TOML file
//! - Environment variables (`CEREBRAS_API_KEY`, `GOOGLE_GEMINI_API_KEY`, ...)
//!
//! The configuration is read once at startup and never reloaded.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod loader;

pub use config::{GatewayConfig, LoggingSection, ProviderConfig};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigLoader};
