//! Chat command - send a conversation through the gateway.

use anyhow::{bail, Result};
use clap::Args;
use futures::StreamExt;
use gateway_config::GatewayConfig;
use gateway_core::{CallOptions, ChatMessage, ProviderKind, Usage};
use gateway_routing::GatewayManager;
use gateway_telemetry::GatewayMetrics;
use serde::Serialize;
use std::io::{self, Read, Write};

use crate::output::{self, OutputFormat};

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send (if not provided, reads from stdin)
    #[arg(short, long)]
    pub message: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Enable streaming output
    #[arg(long)]
    pub stream: bool,

    /// Provider to try first (cerebras, gemini, openai)
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Model for the first provider tried
    #[arg(short = 'M', long)]
    pub model: Option<String>,

    /// Print Prometheus counters after the call
    #[arg(long)]
    pub metrics: bool,
}

/// Chat response for output.
#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub provider: String,
    pub model: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Execute the chat command.
pub async fn execute(args: ChatArgs, config: &GatewayConfig, json: bool) -> Result<()> {
    let format = OutputFormat::from_json_flag(json);

    let message = match &args.message {
        Some(msg) => msg.trim().to_string(),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            input.trim().to_string()
        }
    };

    if message.is_empty() {
        bail!("No message provided");
    }

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &args.system {
        messages.push(ChatMessage::system(system.as_str()));
    }
    messages.push(ChatMessage::user(message));

    let mut options = CallOptions::new();
    if let Some(provider) = args.provider {
        options = options.with_provider(provider);
    }
    if let Some(model) = &args.model {
        options = options.with_model(model.as_str());
    }

    let mut manager = GatewayManager::from_config(config)?;
    if args.metrics {
        manager = manager.with_metrics(GatewayMetrics::new()?);
    }

    let result = if args.stream {
        run_stream(&manager, &messages, &options, format).await
    } else {
        run_chat(&manager, &messages, &options, format).await
    };

    if let Some(metrics) = manager.metrics() {
        output::metrics(&mut io::stdout(), &mut io::stderr(), &metrics.render()?, format)?;
    }

    result
}

async fn run_chat(
    manager: &GatewayManager,
    messages: &[ChatMessage],
    options: &CallOptions,
    format: OutputFormat,
) -> Result<()> {
    let response = manager.chat_with(messages, options).await?;

    match format {
        OutputFormat::Json => output::json(&ChatOutput {
            provider: response.provider,
            model: response.model,
            content: response.content,
            usage: response.usage,
        }),
        OutputFormat::Text => {
            let mut stdout = io::stdout();
            writeln!(stdout, "{}", response.content)?;
            output::served_by(&mut stdout, &response.provider, &response.model, response.usage)?;
            Ok(())
        }
    }
}

async fn run_stream(
    manager: &GatewayManager,
    messages: &[ChatMessage],
    options: &CallOptions,
    format: OutputFormat,
) -> Result<()> {
    let mut stream = manager.stream_with(messages, options).await?;
    let mut stdout = io::stdout();
    let mut served_by = None;

    while let Some(item) = stream.next().await {
        let fragment = match item {
            Ok(fragment) => fragment,
            Err(e) => {
                if format == OutputFormat::Text {
                    writeln!(stdout)?;
                }
                output::error("Stream interrupted");
                return Err(e.into());
            }
        };

        output::fragment(&mut stdout, &fragment, format)?;

        if fragment.done {
            served_by = Some((fragment.provider, fragment.model));
        }
    }

    if format == OutputFormat::Text {
        writeln!(stdout)?;
        if let Some((provider, model)) = served_by {
            output::served_by(&mut stdout, &provider, &model, None)?;
        }
    }

    Ok(())
}
