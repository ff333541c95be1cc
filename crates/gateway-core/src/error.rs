//! Error types for the gateway.

use thiserror::Error;

/// Provider name carried by the aggregate error raised when every adapter failed
pub const MANAGER_PROVIDER_NAME: &str = "GatewayManager";

/// Result type for gateway construction and configuration
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error raised by a vendor adapter, or by the orchestrator on total failure.
///
/// Total-failure errors carry `provider == MANAGER_PROVIDER_NAME` and keep
/// every per-vendor error in `causes`, in the order the vendors were tried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{provider}: {message}")]
pub struct ProviderError {
    /// Human-readable reason
    pub message: String,
    /// Name of the provider that failed
    pub provider: String,
    /// HTTP status code, when a response was received
    pub status: Option<u16>,
    /// Raw vendor error body
    pub payload: Option<String>,
    /// Per-vendor errors collected by the orchestrator
    pub causes: Vec<ProviderError>,
}

impl ProviderError {
    /// Create a provider error without status or payload
    #[must_use]
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            provider: provider.into(),
            status: None,
            payload: None,
            causes: Vec::new(),
        }
    }

    /// Attach the HTTP status code
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the raw vendor error body
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Build the total-failure error from every per-vendor error
    #[must_use]
    pub fn aggregate(causes: Vec<ProviderError>) -> Self {
        let detail = if causes.is_empty() {
            "no providers were attempted".to_string()
        } else {
            causes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        };

        Self {
            message: format!("All providers failed: {detail}"),
            provider: MANAGER_PROVIDER_NAME.to_string(),
            status: None,
            payload: None,
            causes,
        }
    }

    /// Whether this is the orchestrator's total-failure error
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.provider == MANAGER_PROVIDER_NAME
    }
}

/// Gateway-level error
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Invalid gateway configuration; not retryable
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// A provider call failed
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl GatewayError {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
