//! HTTP plumbing shared by the adapters.

use gateway_core::{GatewayError, ProviderError};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Build the HTTP client an adapter owns for its lifetime.
///
/// `timeout` is the only bound on a hung vendor connection.
pub(crate) fn build_client(timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(16)
        .build()
        .map_err(|e| GatewayError::configuration(format!("Failed to create HTTP client: {e}")))
}

/// Turn a non-success response into a provider error, keeping the raw body.
pub(crate) async fn ensure_success(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(provider = %provider, status = %status, "Provider returned an error status");
    Err(vendor_error(provider, status.as_u16(), body))
}

/// Parse a vendor error body.
///
/// Cerebras, OpenAI and Gemini all report `{"error": {"message": ...}}`.
pub(crate) fn vendor_error(provider: &str, status: u16, body: String) -> ProviderError {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => format!("HTTP {status}: {}", parsed.error.message),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    };

    ProviderError::new(provider, message)
        .with_status(status)
        .with_payload(body)
}

/// Map a transport failure (DNS, connect, timeout) to a provider error.
///
/// The request URL is stripped: Gemini carries its API key in the query.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    let err = err.without_url();
    let mut error = ProviderError::new(provider, format!("Request failed: {err}"));
    if let Some(status) = err.status() {
        error = error.with_status(status.as_u16());
    }
    error
}
