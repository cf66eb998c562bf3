mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr so stdout stays clean for `--output json`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("printdash={level},printdash_core={level}"))
        }))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No printer access needed.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "printdash", &mut std::io::stdout());
            Ok(())
        }

        Command::Columns(args) => {
            let cfg = commands::load_config(&cli.global)?;
            let dashboard = commands::build_dashboard(&cfg)?;
            commands::columns::handle(args, &cfg, &dashboard, &cli.global)
        }

        Command::Snapshot => {
            let cfg = commands::load_config(&cli.global)?;
            let dashboard = commands::build_dashboard(&cfg)?;
            tracing::debug!(url = %dashboard.source_url(), "fetching snapshot");
            commands::snapshot::handle(&dashboard, &cli.global).await
        }
    }
}
