//! # CLI Structure and Argument Parsing
//!
//! `nook` follows a command-subcommand layout built with clap derive macros:
//!
//! ```bash
//! # Pull every page from the workspace and sync the icon cache
//! nook refresh
//!
//! # Print the indexed pages, or filter them by name
//! nook list --format json
//! nook find roadmap
//!
//! # Icon cache maintenance
//! nook icons sync --force
//! nook icons clear
//!
//! # Start over
//! nook clear --force
//! ```
//!
//! Global options (`--verbose`, `--debug`, `--quiet`, `--no-color`, `--config`)
//! apply to every command.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::FormatArg;

/// Main CLI structure for the `nook` command
#[derive(Parser, Clone, Debug)]
#[command(name = "nook")]
#[command(version)]
#[command(about = "nook - Local index of your Notion pages", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to the settings file. Also via `NOOK_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "NOOK_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands for the `nook` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Search the workspace, persist the page list and sync icons
    Refresh(RefreshArgs),

    /// Print the indexed pages
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        format: FormatArg,
    },

    /// Print indexed pages whose name contains QUERY (case-insensitive)
    Find {
        /// Text to look for in page names
        query: String,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Delete the saved page list and every cached icon
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Manage the icon cache
    Icons {
        #[command(subcommand)]
        command: IconCommands,
    },

    /// Inspect or create settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Arguments for `nook refresh`
#[derive(Args, Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RefreshArgs {
    /// Reuse the saved page list when one exists instead of searching live
    #[arg(long)]
    pub cached: bool,

    /// Skip the icon cache sync
    #[arg(long = "no-icons")]
    pub no_icons: bool,

    /// Re-download every icon even if already cached
    #[arg(long = "force-icons", conflicts_with = "no_icons")]
    pub force_icons: bool,

    /// Override `search.match_parents` for this run
    #[arg(long = "match-parents")]
    pub match_parents: Option<bool>,

    /// Override `search.skip_untitled` for this run
    #[arg(long = "skip-untitled")]
    pub skip_untitled: Option<bool>,

    #[command(flatten)]
    pub format: FormatArg,
}

/// Icon cache subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum IconCommands {
    /// Download missing icons for the saved pages and delete orphaned ones
    Sync {
        /// Re-download every icon even if already cached
        #[arg(long)]
        force: bool,
    },
    /// Delete every cached icon
    Clear,
}

/// Settings subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Print the effective settings (secret redacted)
    Show,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}
