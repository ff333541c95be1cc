//! Providers command - show configured providers.

use anyhow::Result;
use clap::Args;
use gateway_config::GatewayConfig;
use gateway_core::ProviderKind;
use serde::Serialize;
use tabled::Tabled;

use crate::output;

/// Arguments for the providers command.
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    /// Include providers without an API key
    #[arg(short, long)]
    pub all: bool,
}

/// One row of the providers listing.
#[derive(Debug, Serialize, Tabled)]
pub struct ProviderRow {
    #[tabled(rename = "Provider")]
    pub provider: String,
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Configured")]
    pub configured: bool,
    #[tabled(rename = "Preferred")]
    pub preferred: bool,
}

/// Vendor the gateway would try first, if any is configured.
fn effective_preferred(config: &GatewayConfig) -> Option<ProviderKind> {
    let enabled = config.enabled_providers();
    config
        .preferred_provider
        .filter(|kind| enabled.contains(kind))
        .or_else(|| enabled.first().copied())
}

/// Execute the providers command.
pub fn execute(args: &ProvidersArgs, config: &GatewayConfig, json: bool) -> Result<()> {
    let preferred = effective_preferred(config);

    let rows: Vec<ProviderRow> = ProviderKind::ALL
        .into_iter()
        .filter(|kind| args.all || config.provider(*kind).is_enabled())
        .map(|kind| ProviderRow {
            provider: kind.display_name().to_string(),
            model: config.model_for(kind).to_string(),
            configured: config.provider(kind).is_enabled(),
            preferred: preferred == Some(kind),
        })
        .collect();

    if json {
        return output::json(&rows);
    }

    if preferred.is_none() {
        output::error("No providers configured; set CEREBRAS_API_KEY, GOOGLE_GEMINI_API_KEY or OPENAI_API_KEY");
    }
    output::table(&rows);
    Ok(())
}
