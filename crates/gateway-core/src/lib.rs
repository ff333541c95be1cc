//! # Gateway Core
//!
//! Core types, traits, and error handling for the inference gateway.
//!
//! This crate provides the foundational types shared by every adapter:
//! - Canonical chat messages and conversations
//! - One-shot responses and stream fragments
//! - The `ChatAdapter` trait each vendor implements
//! - Provider and configuration error types

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod provider;
pub mod request;
pub mod response;
pub mod streaming;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult, ProviderError, MANAGER_PROVIDER_NAME};
pub use provider::{ChatAdapter, ProviderKind};
pub use request::{CallOptions, ChatMessage, MessageRole};
pub use response::{ChatResponse, Usage};
pub use streaming::{FragmentStream, StreamFragment, TaggedFragment, TaggedFragmentStream};
