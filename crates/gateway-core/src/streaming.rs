//! Streaming types for the gateway.

use crate::error::ProviderError;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Stream of fragments produced by a single adapter
pub type FragmentStream = BoxStream<'static, Result<StreamFragment, ProviderError>>;

/// Stream of fragments tagged by the orchestrator
pub type TaggedFragmentStream = BoxStream<'static, Result<TaggedFragment, ProviderError>>;

/// One incremental piece of a streamed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFragment {
    /// Text delta, possibly empty
    pub content: String,
    /// Terminal marker
    pub done: bool,
}

impl StreamFragment {
    /// Create a content fragment
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    /// Create the terminal fragment
    #[must_use]
    pub fn done() -> Self {
        Self {
            content: String::new(),
            done: true,
        }
    }

    /// Tag with the serving provider and model
    #[must_use]
    pub fn tagged(self, provider: impl Into<String>, model: impl Into<String>) -> TaggedFragment {
        TaggedFragment {
            content: self.content,
            done: self.done,
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// A fragment as delivered to gateway callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedFragment {
    /// Text delta, possibly empty
    pub content: String,
    /// Terminal marker
    pub done: bool,
    /// Name of the provider serving the stream
    pub provider: String,
    /// Model serving the stream
    pub model: String,
}
