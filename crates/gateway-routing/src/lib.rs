//! # Gateway Routing
//!
//! Provider selection and fallback for the inference gateway.
//!
//! This crate provides:
//! - Adapter construction from [`gateway_config::GatewayConfig`]
//! - [`GatewayManager`], which tries the preferred vendor first and falls back
//!   to the others in registration order

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod factory;
pub mod manager;

// Re-export main types
pub use factory::{build_adapters, create_adapter};
pub use manager::GatewayManager;
