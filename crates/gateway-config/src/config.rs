//! Gateway configuration types.

use crate::error::{ConfigError, ConfigResult};
use gateway_core::ProviderKind;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

/// Complete gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Vendor tried first; the first registered vendor when unset.
    pub preferred_provider: Option<ProviderKind>,

    /// HTTP client timeout for every vendor call.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Cerebras settings.
    pub cerebras: ProviderConfig,

    /// Google Gemini settings.
    #[serde(alias = "google")]
    pub gemini: ProviderConfig,

    /// OpenAI settings.
    pub openai: ProviderConfig,

    /// Logging settings.
    pub logging: LoggingSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            preferred_provider: None,
            request_timeout: default_request_timeout(),
            cerebras: ProviderConfig::default(),
            gemini: ProviderConfig::default(),
            openai: ProviderConfig::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl GatewayConfig {
    /// Default model for a vendor.
    #[must_use]
    pub fn default_model(kind: ProviderKind) -> &'static str {
        match kind {
            ProviderKind::Cerebras => "llama-3.3-70b",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAI => "gpt-4o-mini",
        }
    }

    /// Settings for a vendor.
    #[must_use]
    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Cerebras => &self.cerebras,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAI => &self.openai,
        }
    }

    /// Mutable settings for a vendor.
    pub fn provider_mut(&mut self, kind: ProviderKind) -> &mut ProviderConfig {
        match kind {
            ProviderKind::Cerebras => &mut self.cerebras,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::OpenAI => &mut self.openai,
        }
    }

    /// Model a vendor is configured to use, falling back to its default.
    #[must_use]
    pub fn model_for(&self, kind: ProviderKind) -> &str {
        self.provider(kind)
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| Self::default_model(kind))
    }

    /// Vendors with credentials, in registration order.
    #[must_use]
    pub fn enabled_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| self.provider(*kind).is_enabled())
            .collect()
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns error if any sampling parameter or the timeout is out of range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Validation(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        for kind in ProviderKind::ALL {
            self.provider(kind)
                .validate()
                .map_err(|msg| ConfigError::Validation(format!("{}: {msg}", kind.as_str())))?;
        }

        Ok(())
    }
}

/// Settings for one vendor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; the vendor is disabled without one.
    pub api_key: Option<SecretString>,

    /// Model identifier; the vendor default when unset.
    pub model: Option<String>,

    /// API base URL override.
    pub base_url: Option<String>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum output tokens.
    pub max_tokens: u32,

    /// Nucleus sampling.
    pub top_p: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

impl ProviderConfig {
    /// Whether a non-empty API key is present.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} is outside [0, 2]", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p {} is outside [0, 1]", self.top_p));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_top_p() -> f32 {
    0.95
}
