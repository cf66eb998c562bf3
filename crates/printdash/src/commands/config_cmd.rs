//! Config subcommand handlers.

use std::path::PathBuf;

use serde::Serialize;

use printdash_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Paths {
    config: PathBuf,
    preferences: PathBuf,
}

fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(printdash_config::config_path)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        ConfigCommand::Path => {
            let paths = Paths {
                config: config_file(global),
                preferences: printdash_config::preferences_path(),
            };
            let out = output::render_single(
                global.output,
                &paths,
                |p| {
                    format!(
                        "config:      {}\npreferences: {}",
                        p.config.display(),
                        p.preferences.display()
                    )
                },
                |p| p.config.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
        }

        ConfigCommand::Show => {
            let cfg = super::load_config(global)?;
            let toml = printdash_config::render_toml(&cfg)?;
            let out = output::render_single(global.output, &cfg, |_| toml.clone(), |_| toml.clone())?;
            output::print_output(&out, global.quiet);
        }

        ConfigCommand::Init { force } => {
            let path = config_file(global);
            printdash_config::init_config(&path, force)?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(&format!("wrote default config to {}", path.display()), color)
                );
            }
        }

        ConfigCommand::Validate => {
            let cfg: Config = super::load_config(global)?;
            let dash = cfg.to_dashboard_config()?;
            let summary = format!(
                "configuration valid: {} columns, {} visible by default, {} color rules, polling {}",
                dash.columns.len(),
                dash.default_visible.len(),
                dash.color_rules.len(),
                dash.query().to_url(&dash.base_url),
            );
            output::print_output(&output::success(&summary, color), global.quiet);
        }
    }

    Ok(())
}
