//! OpenAI-compatible chat completions adapter.
//!
//! Serves both Cerebras and OpenAI, which share one wire format:
//! - Endpoint: `POST {base_url}/chat/completions`
//! - Authentication: `Authorization: Bearer {api_key}`
//! - Streaming: `data: {json}` records, terminated by `data: [DONE]`

use crate::http::{build_client, ensure_success, transport_error};
use crate::sse::{fragment_stream, RecordEvent};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use gateway_core::{
    ChatAdapter, ChatMessage, ChatResponse, FragmentStream, GatewayError, ProviderError,
    ProviderKind, Usage,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Cerebras API base URL
pub const CEREBRAS_BASE_URL: &str = "https://api.cerebras.ai/v1";

/// OpenAI API base URL
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone)]
pub struct OpenAICompatConfig {
    /// Vendor served by this configuration (Cerebras or OpenAI)
    pub kind: ProviderKind,
    /// API key
    pub api_key: SecretString,
    /// Model identifier
    pub model: String,
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Nucleus sampling
    pub top_p: f32,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl OpenAICompatConfig {
    fn preset(kind: ProviderKind, api_key: String, model: &str, base_url: &str) -> Self {
        Self {
            kind,
            api_key: SecretString::new(api_key),
            model: model.to_string(),
            base_url: base_url.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.95,
            timeout: Duration::from_secs(120),
        }
    }

    /// Cerebras preset
    #[must_use]
    pub fn cerebras(api_key: impl Into<String>) -> Self {
        Self::preset(ProviderKind::Cerebras, api_key.into(), "llama-3.3-70b", CEREBRAS_BASE_URL)
    }

    /// OpenAI preset
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::preset(ProviderKind::OpenAI, api_key.into(), "gpt-4o-mini", OPENAI_BASE_URL)
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set sampling parameters
    #[must_use]
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self.top_p = top_p;
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Adapter for OpenAI-compatible vendors
pub struct OpenAICompatProvider {
    config: OpenAICompatConfig,
    client: Client,
    completions_url: String,
}

impl OpenAICompatProvider {
    /// Create a new OpenAI-compatible provider
    ///
    /// # Errors
    /// Returns error if the configuration is incomplete or the HTTP client cannot be created
    pub fn new(config: OpenAICompatConfig) -> Result<Self, GatewayError> {
        if config.kind == ProviderKind::Gemini {
            return Err(GatewayError::configuration(
                "Gemini does not speak the chat completions format",
            ));
        }
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(GatewayError::configuration(format!(
                "API key is required for {}",
                config.kind
            )));
        }
        if config.model.trim().is_empty() {
            return Err(GatewayError::configuration(format!(
                "Model is required for {}",
                config.kind
            )));
        }

        let client = build_client(config.timeout)?;
        let completions_url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            config,
            client,
            completions_url,
        })
    }

    /// Translate the conversation into the chat completions body
    fn transform_request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        model: &'a str,
        stream: bool,
    ) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model,
            messages: messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            stream,
        }
    }

    /// Transform the vendor response to the canonical format
    fn transform_response(
        &self,
        response: OpenAIResponse,
        model: &str,
    ) -> Result<ChatResponse, ProviderError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                ProviderError::new(self.config.kind.display_name(), "Response missing completion content")
            })?;

        Ok(ChatResponse {
            content,
            usage: response
                .usage
                .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens, u.total_tokens)),
            model: response.model.unwrap_or_else(|| model.to_string()),
            provider: self.config.kind.display_name().to_string(),
        })
    }
}

/// Decode one chat completions stream record
pub(crate) fn decode_stream_record(payload: &str) -> Result<RecordEvent, serde_json::Error> {
    if payload == "[DONE]" {
        return Ok(RecordEvent::finished());
    }

    let chunk: OpenAIStreamChunk = serde_json::from_str(payload)?;
    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(RecordEvent::default());
    };

    Ok(RecordEvent {
        content: choice.delta.and_then(|d| d.content).unwrap_or_default(),
        finished: choice.finish_reason.is_some(),
    })
}

#[async_trait]
impl ChatAdapter for OpenAICompatProvider {
    fn kind(&self) -> ProviderKind {
        self.config.kind
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<ChatResponse, ProviderError> {
        let provider = self.config.kind.display_name();
        let model = model.unwrap_or(&self.config.model);
        let body = self.transform_request(messages, model, false);

        debug!(
            provider = provider,
            model = %model,
            url = %self.completions_url,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(provider, e))?;

        let response = ensure_success(provider, response).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ProviderError::new(provider, format!("Failed to read response: {}", e.without_url()))
                .with_status(status)
        })?;

        trace!(provider = provider, body = %text, "Received chat completion response");

        let parsed: OpenAIResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(provider, format!("Invalid response JSON: {e}"))
                .with_status(status)
                .with_payload(text.clone())
        })?;

        self.transform_response(parsed, model)
            .map_err(|e| e.with_status(status).with_payload(text))
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<FragmentStream, ProviderError> {
        let provider = self.config.kind.display_name();
        let model = model.unwrap_or(&self.config.model);
        let body = self.transform_request(messages, model, true);

        debug!(
            provider = provider,
            model = %model,
            url = %self.completions_url,
            "Sending streaming chat completion request"
        );

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(provider, e))?;

        let response = ensure_success(provider, response).await?;

        Ok(fragment_stream(
            provider,
            response.bytes_stream().map_err(reqwest::Error::without_url),
            decode_stream_record,
        ))
    }
}

// OpenAI wire types

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    #[serde(default)]
    message: Option<OpenAIResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAIStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIStreamChoice {
    #[serde(default)]
    delta: Option<OpenAIDelta>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIDelta {
    #[serde(default)]
    content: Option<String>,
}
