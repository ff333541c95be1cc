//! Configuration loading from files and the environment.

use crate::config::GatewayConfig;
use crate::error::{ConfigError, ConfigResult};
use gateway_core::ProviderKind;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the preferred vendor.
pub const PREFERRED_PROVIDER_VAR: &str = "AI_PREFERRED_PROVIDER";

/// Environment variables holding each vendor's API key, first match wins.
fn api_key_vars(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::Cerebras => &["CEREBRAS_API_KEY"],
        ProviderKind::Gemini => &["GOOGLE_GEMINI_API_KEY", "GEMINI_API_KEY"],
        ProviderKind::OpenAI => &["OPENAI_API_KEY"],
    }
}

/// Environment variable holding each vendor's model.
fn model_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Cerebras => "CEREBRAS_MODEL",
        ProviderKind::Gemini => "GEMINI_MODEL",
        ProviderKind::OpenAI => "OPENAI_MODEL",
    }
}

/// Parse a configuration file, choosing the format by extension.
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<GatewayConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let config = match extension.as_deref() {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
        }
        Some("toml") => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    debug!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

/// Builds the effective configuration from defaults, an optional file and the
/// environment.
pub struct ConfigLoader {
    path: Option<PathBuf>,
    lookup: Box<dyn Fn(&str) -> Option<String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the process environment
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: None,
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Layer a configuration file under the environment
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replace the environment lookup
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.lookup = Box::new(lookup);
        self
    }

    /// Load, apply environment overrides and validate.
    ///
    /// # Errors
    /// Returns error if the file is unreadable, a value is out of range, or
    /// the preferred provider names no supported vendor
    pub fn load(&self) -> ConfigResult<GatewayConfig> {
        let mut config = match &self.path {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        self.apply_env(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn apply_env(&self, config: &mut GatewayConfig) -> ConfigResult<()> {
        for kind in ProviderKind::ALL {
            let api_key = api_key_vars(kind).iter().find_map(|name| self.var(name));
            let model = self.var(model_var(kind));
            let provider = config.provider_mut(kind);

            if let Some(api_key) = api_key {
                debug!(provider = %kind, "API key taken from environment");
                provider.api_key = Some(SecretString::new(api_key));
            }
            if let Some(model) = model {
                provider.model = Some(model);
            }
        }

        if let Some(name) = self.var(PREFERRED_PROVIDER_VAR) {
            let kind = name
                .parse::<ProviderKind>()
                .map_err(|_| ConfigError::UnknownProvider(name.clone()))?;
            config.preferred_provider = Some(kind);
        }

        Ok(())
    }
}
