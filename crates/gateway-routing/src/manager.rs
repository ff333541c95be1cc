//! Provider selection and fallback.
//!
//! The manager owns one adapter per configured vendor and tries them one at a
//! time, preferred vendor first, then the rest in registration order.
//!
//! - `chat` falls back on any failure.
//! - `stream` falls back only until the first fragment arrives. After that the
//!   caller already holds output from one vendor, so later errors pass through
//!   unchanged and no other vendor is contacted.

use crate::factory::build_adapters;
use futures::stream::{self, StreamExt};
use gateway_config::GatewayConfig;
use gateway_core::{
    CallOptions, ChatAdapter, ChatMessage, ChatResponse, GatewayError, GatewayResult,
    ProviderError, ProviderKind, TaggedFragmentStream,
};
use gateway_telemetry::{GatewayMetrics, Operation, Outcome};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Orchestrates the configured adapters
pub struct GatewayManager {
    adapters: Vec<Arc<dyn ChatAdapter>>,
    preferred: usize,
    metrics: Option<GatewayMetrics>,
}

impl GatewayManager {
    /// Create a manager over adapters given in registration order.
    ///
    /// A preferred vendor with no adapter falls back to the first adapter.
    ///
    /// # Errors
    /// Returns a configuration error if no adapters are given
    pub fn new(
        adapters: Vec<Arc<dyn ChatAdapter>>,
        preferred: Option<ProviderKind>,
    ) -> GatewayResult<Self> {
        if adapters.is_empty() {
            return Err(GatewayError::configuration(
                "No AI providers configured; set at least one API key",
            ));
        }

        let preferred = match preferred {
            Some(kind) => adapters
                .iter()
                .position(|a| a.kind() == kind)
                .unwrap_or_else(|| {
                    warn!(
                        preferred = %kind,
                        fallback = adapters[0].name(),
                        "Preferred provider is not configured"
                    );
                    0
                }),
            None => 0,
        };

        debug!(
            providers = ?adapters.iter().map(|a| a.name()).collect::<Vec<_>>(),
            preferred = adapters[preferred].name(),
            "Gateway manager ready"
        );

        Ok(Self {
            adapters,
            preferred,
            metrics: None,
        })
    }

    /// Build adapters for every vendor with credentials and wrap them.
    ///
    /// # Errors
    /// Returns a configuration error if no vendor is configured or an adapter
    /// cannot be constructed
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        Self::new(build_adapters(config)?, config.preferred_provider)
    }

    /// Attach metrics
    #[must_use]
    pub fn with_metrics(mut self, metrics: GatewayMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Attached metrics, if any
    #[must_use]
    pub fn metrics(&self) -> Option<&GatewayMetrics> {
        self.metrics.as_ref()
    }

    /// Names of the configured adapters, in registration order
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Vendor tried first by default
    #[must_use]
    pub fn preferred_provider(&self) -> ProviderKind {
        self.adapters[self.preferred].kind()
    }

    /// Configured adapters, in registration order
    #[must_use]
    pub fn adapters(&self) -> &[Arc<dyn ChatAdapter>] {
        &self.adapters
    }

    /// Adapter indices in the order they are tried
    fn attempt_order(&self, options: &CallOptions) -> Vec<usize> {
        let first = options
            .provider
            .and_then(|kind| self.adapters.iter().position(|a| a.kind() == kind))
            .unwrap_or(self.preferred);

        std::iter::once(first)
            .chain((0..self.adapters.len()).filter(|i| *i != first))
            .collect()
    }

    fn record(&self, provider: &str, operation: Operation, outcome: Outcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_attempt(provider, operation, outcome);
        }
    }

    fn record_fallback(&self, operation: Operation) {
        if let Some(metrics) = &self.metrics {
            metrics.record_fallback(operation);
        }
    }

    fn total_failure(&self, operation: Operation, failures: Vec<ProviderError>) -> ProviderError {
        if let Some(metrics) = &self.metrics {
            metrics.record_total_failure(operation);
        }
        let err = ProviderError::aggregate(failures);
        error!(operation = operation.as_str(), error = %err, "All providers failed");
        err
    }

    /// One-shot chat with default options
    ///
    /// # Errors
    /// Returns the aggregate error if every provider failed
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatResponse, ProviderError> {
        self.chat_with(messages, &CallOptions::default()).await
    }

    /// One-shot chat.
    ///
    /// The model override applies to the first adapter tried only.
    ///
    /// # Errors
    /// Returns the aggregate error if every provider failed
    pub async fn chat_with(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> Result<ChatResponse, ProviderError> {
        let mut failures = Vec::new();

        for (attempt, index) in self.attempt_order(options).into_iter().enumerate() {
            let adapter = &self.adapters[index];
            let model = if attempt == 0 {
                options.model.as_deref()
            } else {
                self.record_fallback(Operation::Chat);
                None
            };

            debug!(provider = adapter.name(), attempt, "Attempting chat");

            match adapter.chat(messages, model).await {
                Ok(mut response) => {
                    self.record(adapter.name(), Operation::Chat, Outcome::Success);
                    response.provider = adapter.name().to_string();
                    return Ok(response);
                }
                Err(err) => {
                    self.record(adapter.name(), Operation::Chat, Outcome::Failure);
                    warn!(provider = adapter.name(), error = %err, "Chat failed, trying next provider");
                    failures.push(err);
                }
            }
        }

        Err(self.total_failure(Operation::Chat, failures))
    }

    /// Streaming chat with default options
    ///
    /// # Errors
    /// Returns the aggregate error if no provider produced a first fragment
    pub async fn stream(&self, messages: &[ChatMessage]) -> Result<TaggedFragmentStream, ProviderError> {
        self.stream_with(messages, &CallOptions::default()).await
    }

    /// Streaming chat.
    ///
    /// Each adapter gets until its first fragment to succeed. The returned
    /// stream replays that fragment and then forwards the rest, tagged with
    /// the serving provider and model.
    ///
    /// # Errors
    /// Returns the aggregate error if no provider produced a first fragment
    pub async fn stream_with(
        &self,
        messages: &[ChatMessage],
        options: &CallOptions,
    ) -> Result<TaggedFragmentStream, ProviderError> {
        let mut failures = Vec::new();

        for (attempt, index) in self.attempt_order(options).into_iter().enumerate() {
            let adapter = &self.adapters[index];
            let model = if attempt == 0 {
                options.model.as_deref()
            } else {
                self.record_fallback(Operation::Stream);
                None
            };

            debug!(provider = adapter.name(), attempt, "Attempting stream");

            let first = match adapter.stream(messages, model).await {
                Ok(mut fragments) => match fragments.next().await {
                    Some(Ok(first)) => Ok((first, fragments)),
                    Some(Err(err)) => Err(err),
                    None => Err(ProviderError::new(
                        adapter.name(),
                        "Stream ended before the first fragment",
                    )),
                },
                Err(err) => Err(err),
            };

            match first {
                Ok((first, rest)) => {
                    self.record(adapter.name(), Operation::Stream, Outcome::Success);

                    let provider = adapter.name().to_string();
                    let model = model.unwrap_or_else(|| adapter.model()).to_string();
                    let first = first.tagged(provider.clone(), model.clone());
                    let rest = rest.map(move |item| {
                        item.map(|fragment| fragment.tagged(provider.clone(), model.clone()))
                    });

                    let head = stream::once(async move { Ok::<_, ProviderError>(first) });
                    return Ok(Box::pin(head.chain(rest)));
                }
                Err(err) => {
                    self.record(adapter.name(), Operation::Stream, Outcome::Failure);
                    warn!(provider = adapter.name(), error = %err, "Stream failed, trying next provider");
                    failures.push(err);
                }
            }
        }

        Err(self.total_failure(Operation::Stream, failures))
    }
}

impl std::fmt::Debug for GatewayManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayManager")
            .field("providers", &self.provider_names())
            .field("preferred", &self.preferred_provider())
            .finish_non_exhaustive()
    }
}
