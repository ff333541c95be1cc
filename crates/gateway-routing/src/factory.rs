//! Adapter construction from configuration.

use gateway_config::GatewayConfig;
use gateway_core::{ChatAdapter, GatewayResult, ProviderKind};
use gateway_providers::{GeminiConfig, GeminiProvider, OpenAICompatConfig, OpenAICompatProvider};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, info};

/// Build an adapter for every vendor with credentials, in registration order.
///
/// # Errors
/// Returns error if an enabled vendor's adapter cannot be constructed
pub fn build_adapters(config: &GatewayConfig) -> GatewayResult<Vec<Arc<dyn ChatAdapter>>> {
    let mut adapters = Vec::new();

    for kind in ProviderKind::ALL {
        if !config.provider(kind).is_enabled() {
            debug!(provider = %kind, "Provider has no API key, skipping");
            continue;
        }

        info!(provider = %kind, model = %config.model_for(kind), "Initializing provider");
        adapters.push(create_adapter(kind, config)?);
    }

    Ok(adapters)
}

/// Build the adapter for one vendor
///
/// # Errors
/// Returns error if the vendor has no API key or the HTTP client cannot be created
pub fn create_adapter(kind: ProviderKind, config: &GatewayConfig) -> GatewayResult<Arc<dyn ChatAdapter>> {
    let settings = config.provider(kind);
    let api_key = settings
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().clone())
        .unwrap_or_default();
    let model = config.model_for(kind);

    let adapter: Arc<dyn ChatAdapter> = match kind {
        ProviderKind::Gemini => {
            let mut gemini = GeminiConfig::new(api_key)
                .with_model(model)
                .with_sampling(settings.temperature, settings.max_tokens, settings.top_p)
                .with_timeout(config.request_timeout);
            if let Some(base_url) = &settings.base_url {
                gemini = gemini.with_base_url(base_url.clone());
            }
            Arc::new(GeminiProvider::new(gemini)?)
        }
        ProviderKind::Cerebras | ProviderKind::OpenAI => {
            let preset = if kind == ProviderKind::Cerebras {
                OpenAICompatConfig::cerebras(api_key)
            } else {
                OpenAICompatConfig::openai(api_key)
            };
            let mut compat = preset
                .with_model(model)
                .with_sampling(settings.temperature, settings.max_tokens, settings.top_p)
                .with_timeout(config.request_timeout);
            if let Some(base_url) = &settings.base_url {
                compat = compat.with_base_url(base_url.clone());
            }
            Arc::new(OpenAICompatProvider::new(compat)?)
        }
    };

    Ok(adapter)
}
