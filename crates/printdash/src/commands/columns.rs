//! `printdash columns`: inspect and change the stored column selection.

use serde::Serialize;
use tabled::Tabled;

use printdash_config::{Config, RuleConfig};
use printdash_core::{Dashboard, VisibleSet};

use crate::cli::{ColumnsArgs, ColumnsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct ColumnInfo {
    key: String,
    label: String,
    visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Visible")]
    visible: &'static str,
    #[tabled(rename = "Rule")]
    rule: &'static str,
}

impl From<&ColumnInfo> for ColumnRow {
    fn from(c: &ColumnInfo) -> Self {
        Self {
            key: c.key.clone(),
            label: c.label.clone(),
            visible: if c.visible { "✓" } else { "" },
            rule: c.rule.unwrap_or("-"),
        }
    }
}

fn rule_kind(rule: &RuleConfig) -> &'static str {
    match rule {
        RuleConfig::Match { .. } => "match",
        RuleConfig::Ranges { .. } => "ranges",
        RuleConfig::Thresholds { .. } => "thresholds",
    }
}

fn column_infos(cfg: &Config, visible: &VisibleSet) -> Vec<ColumnInfo> {
    cfg.columns
        .iter()
        .map(|c| ColumnInfo {
            key: c.key.clone(),
            label: c.label.clone(),
            visible: visible.contains(&c.key),
            rule: cfg.color_rules.get(&c.key).map(rule_kind),
        })
        .collect()
}

fn visible_summary(dashboard: &Dashboard) -> String {
    let keys: Vec<String> = dashboard.visible_columns().into_iter().map(|c| c.key).collect();
    if keys.is_empty() {
        "Visible: (none)".to_owned()
    } else {
        format!("Visible: {}", keys.join(", "))
    }
}

/// Reject the whole batch before touching the selection.
fn check_keys(dashboard: &Dashboard, keys: &[String]) -> Result<(), CliError> {
    match keys.iter().find(|k| !dashboard.config().is_configured(k)) {
        Some(key) => Err(CliError::UnknownColumn { key: key.clone() }),
        None => Ok(()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    args: ColumnsArgs,
    cfg: &Config,
    dashboard: &Dashboard,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    let message = match args.command {
        ColumnsCommand::List => {
            let infos = column_infos(cfg, &dashboard.visible_set());
            let out = output::render_list(
                global.output,
                &infos,
                |c| ColumnRow::from(c),
                |c| format!("{}\t{}", c.key, if c.visible { "on" } else { "off" }),
            )?;
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        ColumnsCommand::Show { keys } => {
            check_keys(dashboard, &keys)?;
            for key in &keys {
                dashboard.set_field(key, true)?;
            }
            format!("shown: {}", keys.join(", "))
        }
        ColumnsCommand::Hide { keys } => {
            check_keys(dashboard, &keys)?;
            for key in &keys {
                dashboard.set_field(key, false)?;
            }
            format!("hidden: {}", keys.join(", "))
        }
        ColumnsCommand::AllOn => {
            dashboard.set_all(true)?;
            "all columns shown".to_owned()
        }
        ColumnsCommand::AllOff => {
            dashboard.set_all(false)?;
            "all columns hidden".to_owned()
        }
        ColumnsCommand::Reset => {
            dashboard.reset_visible()?;
            "restored default columns".to_owned()
        }
    };

    if !global.quiet {
        eprintln!("{}", output::success(&message, color));
    }
    output::print_output(&visible_summary(dashboard), global.quiet);
    Ok(())
}
