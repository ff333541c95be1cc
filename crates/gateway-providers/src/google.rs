//! Google Gemini provider implementation.
//!
//! Talks to the Google AI Studio API.
//!
//! # API Format
//! - One-shot: `POST {base_url}/models/{MODEL}:generateContent?key={API_KEY}`
//! - Streaming: `POST {base_url}/models/{MODEL}:streamGenerateContent?alt=sse&key={API_KEY}`
//!
//! The streaming body carries no sentinel; a candidate with a `finishReason`
//! ends the response.

use crate::http::{build_client, ensure_success, transport_error};
use crate::sse::{fragment_stream, RecordEvent};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use gateway_core::{
    ChatAdapter, ChatMessage, ChatResponse, FragmentStream, GatewayError, MessageRole,
    ProviderError, ProviderKind, Usage,
};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Google AI Studio base URL
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "Gemini";

/// Gemini provider configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: SecretString,
    /// Model identifier
    pub model: String,
    /// API base URL
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

impl GeminiConfig {
    /// Create a new Google AI Studio configuration
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            model: "gemini-1.5-flash".to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.95,
            timeout: Duration::from_secs(120),
        }
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

/// Google Gemini provider
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    /// Returns error if the configuration is incomplete or the HTTP client cannot be created
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(GatewayError::configuration("API key is required for Gemini"));
        }
        if config.model.trim().is_empty() {
            return Err(GatewayError::configuration("Model is required for Gemini"));
        }

        let client = build_client(config.timeout)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            config,
            client,
            base_url,
        })
    }

    /// Build the endpoint URL for a model, without credentials
    fn endpoint_url(&self, model: &str, streaming: bool) -> String {
        let action = if streaming {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!("{}/models/{}:{}", self.base_url, model, action)
    }

    /// Authenticated POST for an endpoint
    fn post(&self, url: &str, streaming: bool) -> RequestBuilder {
        let request = self.client.post(url);
        let request = if streaming {
            request.query(&[("alt", "sse")])
        } else {
            request
        };
        request.query(&[("key", self.config.api_key.expose_secret().as_str())])
    }

    /// Transform the conversation to Gemini's format.
    ///
    /// Gemini has no system role: system text goes to `systemInstruction`,
    /// one part per message, and never appears in `contents`.
    fn transform_request<'a>(&self, messages: &'a [ChatMessage]) -> GeminiRequest<'a> {
        let mut contents = Vec::with_capacity(messages.len());
        let mut system_parts = Vec::new();

        for message in messages {
            let part = GeminiPart {
                text: &message.content,
            };
            match message.role {
                MessageRole::System => system_parts.push(part),
                MessageRole::User => contents.push(GeminiContent {
                    role: Some("user"),
                    parts: vec![part],
                }),
                MessageRole::Assistant => contents.push(GeminiContent {
                    role: Some("model"),
                    parts: vec![part],
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| GeminiContent {
            role: None,
            parts: system_parts,
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_tokens,
            },
        }
    }

    /// Transform Gemini's response to the canonical format
    fn transform_response(response: GeminiResponse, model: &str) -> Result<ChatResponse, ProviderError> {
        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| candidate_text(c.parts))
            .ok_or_else(|| ProviderError::new(PROVIDER, "Response missing candidate text"))?;

        Ok(ChatResponse {
            content,
            usage: response.usage_metadata.map(|u| {
                Usage::new(
                    u.prompt_token_count,
                    u.candidates_token_count.unwrap_or(0),
                    u.total_token_count,
                )
            }),
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            provider: PROVIDER.to_string(),
        })
    }
}

/// Join the text parts of one candidate; `None` when it carried no text
fn candidate_text(parts: Vec<GeminiResponsePart>) -> Option<String> {
    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    (!texts.is_empty()).then(|| texts.concat())
}

/// Decode one `streamGenerateContent` record
pub(crate) fn decode_stream_record(payload: &str) -> Result<RecordEvent, serde_json::Error> {
    let chunk: GeminiResponse = serde_json::from_str(payload)?;
    let Some(candidate) = chunk.candidates.into_iter().next() else {
        return Ok(RecordEvent::default());
    };

    Ok(RecordEvent {
        content: candidate
            .content
            .and_then(|c| candidate_text(c.parts))
            .unwrap_or_default(),
        finished: candidate.finish_reason.is_some(),
    })
}

#[async_trait]
impl ChatAdapter for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<ChatResponse, ProviderError> {
        let model = model.unwrap_or(&self.config.model);
        let url = self.endpoint_url(model, false);
        let body = self.transform_request(messages);

        debug!(provider = PROVIDER, model = %model, url = %url, "Sending generateContent request");

        let response = self
            .post(&url, false)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ProviderError::new(PROVIDER, format!("Failed to read response: {}", e.without_url()))
                .with_status(status)
        })?;

        trace!(provider = PROVIDER, body = %text, "Received generateContent response");

        let parsed: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(PROVIDER, format!("Invalid response JSON: {e}"))
                .with_status(status)
                .with_payload(text.clone())
        })?;

        Self::transform_response(parsed, model).map_err(|e| e.with_status(status).with_payload(text))
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<FragmentStream, ProviderError> {
        let model = model.unwrap_or(&self.config.model);
        let url = self.endpoint_url(model, true);
        let body = self.transform_request(messages);

        debug!(provider = PROVIDER, model = %model, url = %url, "Sending streamGenerateContent request");

        let response = self
            .post(&url, true)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let response = ensure_success(PROVIDER, response).await?;

        Ok(fragment_stream(
            PROVIDER,
            response.bytes_stream().map_err(reqwest::Error::without_url),
            decode_stream_record,
        ))
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}
