//! Output format selection and page rendering.
//!
//! Commands that print pages accept `-f/--format`. When the flag is omitted the
//! format follows the terminal: text for a TTY, JSON when piped.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use is_terminal::IsTerminal;
use nook_core::PageRecord;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colored text (default on a terminal)
    Text,
    /// Single JSON array
    Json,
    /// Newline-delimited JSON, one page per line
    Jsonl,
}

/// Shared `--format` flag
#[derive(Args, Clone, Debug, Default)]
pub struct FormatArg {
    /// Output format
    #[arg(short = 'f', long = "format", value_enum, env = "NOOK_OUTPUT_FORMAT")]
    pub format: Option<OutputFormat>,
}

impl FormatArg {
    /// Effective format: the explicit flag, else text on a terminal and JSON when piped.
    #[must_use]
    pub fn resolve(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                OutputFormat::Text
            } else {
                OutputFormat::Json
            }
        })
    }

    /// Whether the resolved format is machine-readable.
    #[must_use]
    pub fn is_machine(&self) -> bool {
        matches!(self.resolve(), OutputFormat::Json | OutputFormat::Jsonl)
    }
}

/// Write `pages` to `out` in the requested format.
///
/// Text output prints one page per line as the display label followed by the
/// dimmed URL. An empty list prints `[]` for JSON and nothing for JSONL.
pub fn write_pages<W: Write>(out: &mut W, pages: &[PageRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let width = pages
                .iter()
                .map(|page| page.label().chars().count())
                .max()
                .unwrap_or(0);
            for page in pages {
                let label = page.label();
                let pad = width.saturating_sub(label.chars().count());
                let marker = if page.icon.is_some() { "◆" } else { "·" };
                writeln!(
                    out,
                    "{} {}{}  {}",
                    marker.cyan(),
                    label.bold(),
                    " ".repeat(pad),
                    page.url.bright_black()
                )?;
            }
        },
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, pages)?;
            writeln!(out)?;
        },
        OutputFormat::Jsonl => {
            for page in pages {
                serde_json::to_writer(&mut *out, page)?;
                writeln!(out)?;
            }
        },
    }
    Ok(())
}
