//! Request types for the gateway.
//!
//! This module defines the canonical conversation format every vendor adapter
//! consumes, independent of any vendor's wire schema.

use crate::provider::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

impl MessageRole {
    /// Wire name shared by the OpenAI-compatible vendors
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged message. A slice of these, earliest first, is a conversation.
///
/// Empty content is accepted and forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Per-call selection hints supplied by the caller.
///
/// `provider` replaces the preferred adapter for this call when that provider
/// is configured. `model` only applies to the first adapter tried; fallback
/// adapters keep their configured model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Provider to try first
    pub provider: Option<ProviderKind>,
    /// Model override for the first adapter tried
    pub model: Option<String>,
}

impl CallOptions {
    /// Create empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider to try first
    #[must_use]
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the model override
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
