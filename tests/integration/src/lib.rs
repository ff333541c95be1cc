//! Integration tests for the inference gateway
//!
//! This crate covers the adapters and the manager end to end against
//! wiremock vendors:
//! - Per-vendor chat and streaming translation
//! - Ordered fallback and total failure
//! - Event-stream resilience and the terminal fragment

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
pub use fixtures::*;
pub use helpers::*;
pub use mock_providers::*;

#[cfg(test)]
mod fallback_tests;
#[cfg(test)]
mod provider_tests;
