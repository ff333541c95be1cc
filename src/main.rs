//! # Study Gateway
//!
//! Command-line front end for the multi-provider inference gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Ask a question with whichever provider is configured
//! CEREBRAS_API_KEY=... study-gateway chat -m "Explain TCP slow start"
//!
//! # Stream the answer, preferring Gemini
//! study-gateway chat --stream --provider gemini -m "Summarize chapter 3"
//!
//! # Show which providers are configured
//! study-gateway providers
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli.execute().await
}
