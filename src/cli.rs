//! CLI argument definitions using clap.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gateway_config::{ConfigLoader, GatewayConfig};
use gateway_telemetry::{init_logging, LoggingConfig};
use std::path::PathBuf;
use tracing::debug;

use crate::commands;

/// Study Gateway - chat with Cerebras, Gemini or OpenAI with automatic fallback
#[derive(Parser, Debug)]
#[command(name = "study-gateway")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (.yaml, .yml or .toml)
    #[arg(short, long, env = "STUDY_GATEWAY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a conversation to the gateway
    Chat(commands::chat::ChatArgs),

    /// List configured providers
    Providers(commands::providers::ProvidersArgs),
}

impl Cli {
    /// Load configuration, install logging and run the command.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        self.init_logging(&config);
        debug!(providers = ?config.enabled_providers(), "Configuration loaded");

        match self.command {
            Commands::Chat(args) => commands::chat::execute(args, &config, self.json).await,
            Commands::Providers(args) => commands::providers::execute(&args, &config, self.json),
        }
    }

    fn load_config(&self) -> Result<GatewayConfig> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_file(path);
        }
        loader.load().context("Failed to load configuration")
    }

    /// `-v` flags override the configured level.
    fn init_logging(&self, config: &GatewayConfig) {
        let level = match self.verbose {
            0 => config.logging.level.clone(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        };

        let logging = LoggingConfig::new(level)
            .with_json(self.json || config.logging.json)
            .with_location(self.verbose > 2);

        if let Err(e) = init_logging(&logging) {
            eprintln!("Failed to initialize logging: {e}");
        }
    }
}
