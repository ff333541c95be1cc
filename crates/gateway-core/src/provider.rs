//! Provider abstraction.
//!
//! Every vendor adapter implements [`ChatAdapter`]; the orchestrator holds them
//! as trait objects and never needs to know which wire format sits behind one.

use crate::error::ProviderError;
use crate::request::ChatMessage;
use crate::response::ChatResponse;
use crate::streaming::FragmentStream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported vendors, in default registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Cerebras inference (OpenAI-compatible wire format)
    Cerebras,
    /// Google Gemini (generateContent wire format)
    #[serde(alias = "google")]
    Gemini,
    /// OpenAI chat completions
    #[serde(rename = "openai")]
    OpenAI,
}

impl ProviderKind {
    /// All vendors in registration order
    pub const ALL: [Self; 3] = [Self::Cerebras, Self::Gemini, Self::OpenAI];

    /// Display name used to tag responses, fragments and errors
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cerebras => "Cerebras",
            Self::Gemini => "Gemini",
            Self::OpenAI => "OpenAI",
        }
    }

    /// Lowercase identifier used in configuration
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cerebras => "cerebras",
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cerebras" => Ok(Self::Cerebras),
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// Uniform two-operation contract implemented by every vendor adapter.
///
/// Adapters hold only read-only configuration, so one instance can serve
/// concurrent calls. Neither operation retries: one failed HTTP call is one
/// failed operation.
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Vendor behind this adapter
    fn kind(&self) -> ProviderKind;

    /// Name used to tag results
    fn name(&self) -> &str {
        self.kind().display_name()
    }

    /// Configured model identifier
    fn model(&self) -> &str;

    /// Send a conversation and wait for the complete response.
    ///
    /// `model` overrides the configured model for this call only.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<ChatResponse, ProviderError>;

    /// Send a conversation and receive the response incrementally.
    ///
    /// Errors returned here happened before any body byte was read. The
    /// returned stream ends with exactly one `done` fragment unless it yields
    /// an error first. Dropping the stream releases the HTTP connection.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<FragmentStream, ProviderError>;
}
