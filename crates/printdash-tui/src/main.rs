//! `printdash-tui`: live terminal view of a printer's telemetry.
//!
//! Polls the add-on's `/devices` endpoint through `printdash-core`'s
//! [`Dashboard`](printdash_core::Dashboard) and renders the metrics table
//! with its color rules. The column selection is shared with the
//! `printdash` CLI through the same preferences file.
//!
//! Logs are written to a file (default `/tmp/printdash-tui.log`) so they
//! never corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod layout;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use printdash_core::{Dashboard, FileStore};

use crate::app::App;

/// Terminal dashboard for a networked printer.
#[derive(Parser, Debug)]
#[command(name = "printdash-tui", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long, env = "PRINTDASH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the add-on base URL (e.g., http://printer.lan:8099)
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Override the refresh interval in seconds (0 disables polling)
    #[arg(short = 'i', long)]
    interval: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/printdash-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing; anything on stdout/stderr would tear the UI.
/// The returned guard flushes the writer when dropped.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("printdash_tui={log_level},printdash_core={log_level}"))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("printdash-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve config file + flags into a ready controller.
fn build_dashboard(cli: &Cli) -> Result<Dashboard> {
    let mut cfg = printdash_config::load_config(cli.config.as_deref())
        .wrap_err("failed to load configuration")?;

    if let Some(url) = &cli.url {
        cfg.endpoint.base_url.clone_from(url);
    }
    if let Some(secs) = cli.interval {
        cfg.refresh_interval_secs = secs;
    }

    let dash = cfg.to_dashboard_config()?;
    let store = Arc::new(FileStore::new(printdash_config::preferences_path()));
    Ok(Dashboard::new(dash, store)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches modes.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let dashboard = build_dashboard(&cli)?;
    info!(url = %dashboard.source_url(), "starting printdash-tui");

    let mut app = App::new(dashboard);
    app.run().await?;

    Ok(())
}
