//! Clap derive structures for the `printdash` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// printdash -- printer telemetry from the command line
#[derive(Debug, Parser)]
#[command(
    name = "printdash",
    version,
    about = "Query a networked printer's telemetry from the command line",
    long_about = "Fetches the add-on's /devices endpoint, renders the configured metrics\n\
        table, and manages which columns the dashboard shows.\n\n\
        The column selection is shared with printdash-tui.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'c', env = "PRINTDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Add-on base URL (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub url: Option<String>,

    /// Printer device name (overrides config)
    #[arg(long, short = 'd', global = true)]
    pub device: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PRINTDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, tab-separated (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color if stdout is a terminal and NO_COLOR is unset
    Auto,
    Always,
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one refresh cycle and print the table
    #[command(alias = "snap", alias = "s")]
    Snapshot,

    /// Show or change which columns the dashboard displays
    #[command(alias = "col")]
    Columns(ColumnsArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(subcommand)]
    pub command: ColumnsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ColumnsCommand {
    /// List configured columns and whether each is visible
    #[command(alias = "ls")]
    List,

    /// Show one or more columns
    Show {
        /// Column keys (e.g. _dn _page)
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Hide one or more columns
    Hide {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show every configured column
    AllOn,

    /// Hide every column
    AllOff,

    /// Restore the configured default selection
    Reset,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config and preferences file locations
    Path,

    /// Print the effective configuration (defaults + file + environment)
    Show,

    /// Write the default configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the configuration without contacting the printer
    Validate,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
