//! Response types for the gateway.

use serde::{Deserialize, Serialize};

/// Token usage reported by a vendor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl Usage {
    /// Create usage, deriving the total when the vendor omitted it
    #[must_use]
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: Option<u32>) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: total_tokens
                .unwrap_or_else(|| prompt_tokens.saturating_add(completion_tokens)),
        }
    }
}

/// Result of a one-shot chat call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Completion text
    pub content: String,
    /// Token usage, only when the vendor reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Model reported by the vendor, or the requested model
    pub model: String,
    /// Name of the provider that served the call
    pub provider: String,
}
