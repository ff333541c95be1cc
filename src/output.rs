//! Output formatting utilities for the CLI.
//!
//! Stdout carries only the answer in the selected format. Diagnostics and, in
//! JSON mode, the metrics exposition go to stderr so stdout stays parseable.

use colored::Colorize;
use gateway_core::{TaggedFragment, Usage};
use serde::Serialize;
use std::io::{self, Write};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Create an output format from a JSON flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Print an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a value as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a table of data.
pub fn table<T: tabled::Tabled>(data: &[T]) {
    use tabled::{settings::Style, Table};

    println!("{}", Table::new(data).with(Style::rounded()));
}

/// Footer naming the provider and model that served a response.
pub fn served_by(out: &mut impl Write, provider: &str, model: &str, usage: Option<Usage>) -> io::Result<()> {
    writeln!(out, "\n{}", "Response".bold().underline())?;
    writeln!(out, "  {}: {provider}", "Provider".bold())?;
    writeln!(out, "  {}: {model}", "Model".bold())?;
    if let Some(usage) = usage {
        writeln!(
            out,
            "  {}: {} prompt + {} completion = {}",
            "Tokens".bold(),
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        )?;
    }
    Ok(())
}

/// Write one stream fragment as it arrives.
///
/// Text mode prints the content only; JSON mode prints one object per line.
pub fn fragment(out: &mut impl Write, fragment: &TaggedFragment, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{}", fragment.content)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(fragment)?)?,
    }
    out.flush()?;
    Ok(())
}

/// Write the Prometheus exposition.
///
/// Text mode appends it to stdout under a header; JSON mode sends it to
/// stderr.
pub fn metrics(
    stdout: &mut impl Write,
    stderr: &mut impl Write,
    exposition: &str,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(stdout, "\n{}", "Metrics".bold().underline())?;
            write!(stdout, "{exposition}")
        }
        OutputFormat::Json => write!(stderr, "{exposition}"),
    }
}
