//! Command dispatch and shared setup.

pub mod columns;
pub mod config_cmd;
pub mod snapshot;

use std::sync::Arc;

use printdash_config::Config;
use printdash_core::{Dashboard, FileStore};
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the layered config and apply command-line overrides.
pub fn load_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = printdash_config::load_config(global.config.as_deref())?;
    if let Some(url) = &global.url {
        cfg.endpoint.base_url.clone_from(url);
    }
    if let Some(device) = &global.device {
        cfg.device.name.clone_from(device);
    }
    if global.insecure {
        cfg.endpoint.insecure = true;
    }
    Ok(cfg)
}

/// Validate the config and open the controller on the shared preferences file.
pub fn build_dashboard(cfg: &Config) -> Result<Dashboard, CliError> {
    let dash = cfg.to_dashboard_config()?;
    let prefs = printdash_config::preferences_path();
    debug!(preferences = %prefs.display(), "opening preference store");
    Ok(Dashboard::new(dash, Arc::new(FileStore::new(prefs)))?)
}
