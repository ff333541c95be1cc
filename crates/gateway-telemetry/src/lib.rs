//! # Gateway Telemetry
//!
//! Observability for the inference gateway.
//!
//! This crate provides:
//! - Structured logging with `tracing`
//! - Prometheus counters for provider attempts and fallbacks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;
pub mod metrics;

// Re-export main types
pub use logging::{init_logging, LoggingConfig, TelemetryError};
pub use metrics::{GatewayMetrics, Operation, Outcome};
