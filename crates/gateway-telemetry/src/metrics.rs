//! Prometheus metrics for the gateway.
//!
//! Every [`GatewayMetrics`] owns its registry, so separate managers (and
//! tests) never collide on metric names.

use crate::logging::TelemetryError;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Gateway operation being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// One-shot chat
    Chat,
    /// Streaming chat
    Stream,
}

impl Operation {
    /// Label value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Stream => "stream",
        }
    }
}

/// Result of one provider attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The provider served the call
    Success,
    /// The provider failed and the next one was tried
    Failure,
}

impl Outcome {
    /// Label value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Provider attempt and fallback counters
#[derive(Clone)]
pub struct GatewayMetrics {
    registry: Registry,
    provider_requests: IntCounterVec,
    fallbacks: IntCounterVec,
    total_failures: IntCounterVec,
}

impl GatewayMetrics {
    /// Create the counters and register them in a fresh registry
    ///
    /// # Errors
    /// Returns error if a metric cannot be created or registered
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let provider_requests = IntCounterVec::new(
            Opts::new(
                "gateway_provider_requests_total",
                "Provider attempts by provider, operation and outcome",
            ),
            &["provider", "operation", "outcome"],
        )
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

        let fallbacks = IntCounterVec::new(
            Opts::new(
                "gateway_fallbacks_total",
                "Calls that moved on to another provider",
            ),
            &["operation"],
        )
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

        let total_failures = IntCounterVec::new(
            Opts::new(
                "gateway_total_failures_total",
                "Calls on which every provider failed",
            ),
            &["operation"],
        )
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;

        for collector in [&provider_requests, &fallbacks, &total_failures] {
            registry
                .register(Box::new(collector.clone()))
                .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        }

        Ok(Self {
            registry,
            provider_requests,
            fallbacks,
            total_failures,
        })
    }

    /// Record one provider attempt
    pub fn record_attempt(&self, provider: &str, operation: Operation, outcome: Outcome) {
        self.provider_requests
            .with_label_values(&[provider, operation.as_str(), outcome.as_str()])
            .inc();
    }

    /// Record a move to the next provider
    pub fn record_fallback(&self, operation: Operation) {
        self.fallbacks.with_label_values(&[operation.as_str()]).inc();
    }

    /// Record a call on which every provider failed
    pub fn record_total_failure(&self, operation: Operation) {
        self.total_failures
            .with_label_values(&[operation.as_str()])
            .inc();
    }

    /// Attempts recorded for one label set
    #[must_use]
    pub fn attempts(&self, provider: &str, operation: Operation, outcome: Outcome) -> u64 {
        self.provider_requests
            .with_label_values(&[provider, operation.as_str(), outcome.as_str()])
            .get()
    }

    /// Fallbacks recorded for an operation
    #[must_use]
    pub fn fallbacks(&self, operation: Operation) -> u64 {
        self.fallbacks.with_label_values(&[operation.as_str()]).get()
    }

    /// Total failures recorded for an operation
    #[must_use]
    pub fn total_failures(&self, operation: Operation) -> u64 {
        self.total_failures
            .with_label_values(&[operation.as_str()])
            .get()
    }

    /// Render the Prometheus text exposition format
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn render(&self) -> Result<String, TelemetryError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

impl std::fmt::Debug for GatewayMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayMetrics").finish_non_exhaustive()
    }
}
