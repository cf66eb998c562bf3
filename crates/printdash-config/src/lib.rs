//! Shared configuration for the printdash CLI and TUI.
//!
//! TOML file + `PRINTDASH_*` environment layering via figment, config and
//! state path resolution, and translation to `printdash_core::DashboardConfig`.
//! The built-in defaults describe the ComeTrue printer dashboard.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use printdash_core::{
    ColorRule, ColorRules, ColumnDef, DashboardConfig, DisplayOverrides, Labels, RangeRule,
    RefreshPolicy, Threshold, TlsMode,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: Endpoint,

    #[serde(default)]
    pub device: Device,

    /// Seconds between scheduled refreshes; 0 disables the schedule.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Versioned key for the stored column selection.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default)]
    pub default_visible: Vec<String>,

    /// Column definitions in display order.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,

    #[serde(default)]
    pub color_rules: HashMap<String, RuleConfig>,

    #[serde(default)]
    pub display_overrides: HashMap<String, String>,

    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Endpoint {
    /// Endpoint root, e.g. `http://homeassistant.local:8099`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Device {
    /// Display-case device name; its lowercase form builds the entity prefix.
    #[serde(default = "default_device_name")]
    pub name: String,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            name: default_device_name(),
        }
    }
}

/// One color rule as written in TOML, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    Match { entries: Vec<MatchEntry> },
    Ranges { ranges: Vec<RangeEntry> },
    /// First threshold the value exceeds wins; `otherwise` applies below all.
    Thresholds {
        thresholds: Vec<ThresholdEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        otherwise: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchEntry {
    pub text: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeEntry {
    pub min: f64,
    pub max: f64,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ThresholdEntry {
    pub above: f64,
    pub class: String,
}

fn default_base_url() -> String {
    "http://localhost:8099".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_device_name() -> String {
    "ComeTrue".into()
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_storage_key() -> String {
    "status2_visible_columns_v3".into()
}

// ── Built-in defaults ───────────────────────────────────────────────

const DEFAULT_COLUMNS: &[(&str, &str)] = &[
    ("_action", "機台當前動作"),
    ("_fwversion", "固件版本"),
    ("_a", "清潔液量"),
    ("_al", "校正情況"),
    ("_c", "C墨水量"),
    ("_cm", "CM頭壽命"),
    ("_dn", "上蓋狀態"),
    ("_fs", "參數版本"),
    ("_he", "墨頭安裝情況"),
    ("_id", "ID"),
    ("_k", "K墨水量"),
    ("_m", "M墨水量"),
    ("_p", "癈粉量"),
    ("_page", "當前打印頁"),
    ("_totalpage", "總頁數"),
    ("_tsrm", "TSRM"),
    ("_w", "W膠水量"),
    ("_y", "Y墨水量"),
    ("_yk", "YK頭壽命"),
    ("_z1", "Z1高度"),
    ("_z2", "Z2高度"),
    ("_swversion", "軟體版本"),
    ("_model", "機台型號"),
];

const DEFAULT_VISIBLE: &[&str] = &["_action", "_dn", "_page", "_totalpage", "_z1", "_model"];

/// Machine states shown as faults, in English and both Chinese scripts.
const ACTION_BAD: &[&str] = &[
    "Fast-axis error!",
    "Tsr err",
    "InkJet over voltage!",
    "The upper lid is opened!",
    "InkJet CM temperature incorrect!",
    "InkJet YK temperature incorrect!",
    "Both InkJet temperature incorrect!",
    "Slow-axis error!",
    "Disconnect",
    "快軸移動錯誤",
    "噴頭電壓過高",
    "Upper lid Open",
    "CM過熱",
    "YK過熱",
    "CMYK過熱",
    "X軸錯誤",
    "未連線",
    "快轴移动错误",
    "喷头电压过高",
    "CM过热",
    "YK过热",
    "CMYK过热",
    "X轴错误",
    "未连线",
];

const ACTION_WARN: &[&str] = &["unavailable", "unknown"];

impl Default for Config {
    fn default() -> Self {
        let action_entries = ACTION_BAD
            .iter()
            .map(|t| (t, "c-bad"))
            .chain(ACTION_WARN.iter().map(|t| (t, "c-warn")))
            .map(|(text, class)| MatchEntry {
                text: (*text).into(),
                class: class.into(),
            })
            .collect();

        Self {
            endpoint: Endpoint::default(),
            device: Device::default(),
            refresh_interval_secs: default_refresh_interval(),
            refresh_policy: RefreshPolicy::default(),
            storage_key: default_storage_key(),
            default_visible: DEFAULT_VISIBLE.iter().map(|k| (*k).into()).collect(),
            columns: DEFAULT_COLUMNS
                .iter()
                .map(|(key, label)| ColumnDef::new(*key, *label))
                .collect(),
            color_rules: HashMap::from([(
                "_action".to_owned(),
                RuleConfig::Match {
                    entries: action_entries,
                },
            )]),
            display_overrides: HashMap::from([
                ("unavailable".to_owned(), "軟體離線".to_owned()),
                ("unknown".to_owned(), "數據未更新".to_owned()),
            ]),
            labels: Labels::default(),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "printdash", "printdash")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("printdash");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for mutable user state (preferences).
pub fn state_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/state"),
        |dirs| {
            dirs.state_dir()
                .map_or_else(|| dirs.data_local_dir().to_path_buf(), Path::to_path_buf)
        },
    )
}

/// JSON preference file holding the stored column selection.
pub fn preferences_path() -> PathBuf {
    state_dir().join("preferences.json")
}

// ── Config loading ──────────────────────────────────────────────────

/// Layered provider: defaults, then the TOML file, then `PRINTDASH_*`
/// environment variables (`__` separates nested keys).
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PRINTDASH_").split("__"))
}

/// Load the full Config from file + environment. `path` overrides the
/// canonical config location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

pub fn render_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_toml(cfg)?)?;
    Ok(())
}

/// Write the default config to `path` unless a file is already there.
pub fn init_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    save_config(&Config::default(), path)
}

// ── Translation to core ─────────────────────────────────────────────

impl RuleConfig {
    fn compile(&self, column: &str) -> Result<ColorRule, ConfigError> {
        let field = || format!("color_rules.{column}");
        match self {
            Self::Match { entries } => Ok(ColorRule::matching(
                entries.iter().map(|e| (e.text.clone(), e.class.clone())),
            )),
            Self::Ranges { ranges } => {
                let inverted = |r: &&RangeEntry| r.min.is_nan() || r.max.is_nan() || r.min > r.max;
                if let Some(bad) = ranges.iter().find(inverted) {
                    return Err(invalid(
                        field(),
                        format!("range min {} exceeds max {}", bad.min, bad.max),
                    ));
                }
                Ok(ColorRule::Ranges(
                    ranges
                        .iter()
                        .map(|r| RangeRule {
                            min: r.min,
                            max: r.max,
                            class: r.class.clone(),
                        })
                        .collect(),
                ))
            }
            Self::Thresholds {
                thresholds,
                otherwise,
            } => {
                if thresholds.is_empty() && otherwise.is_none() {
                    return Err(invalid(field(), "thresholds rule has no classes"));
                }
                Ok(ColorRule::thresholds(
                    thresholds
                        .iter()
                        .map(|t| Threshold {
                            above: t.above,
                            class: t.class.clone(),
                        })
                        .collect(),
                    otherwise.clone(),
                ))
            }
        }
    }
}

impl Config {
    /// Validate and build the runtime configuration.
    pub fn to_dashboard_config(&self) -> Result<DashboardConfig, ConfigError> {
        let base_url: url::Url = self
            .endpoint
            .base_url
            .parse()
            .map_err(|_| {
                invalid(
                    "endpoint.base_url",
                    format!("invalid URL: {}", self.endpoint.base_url),
                )
            })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(
                "endpoint.base_url",
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        if self.endpoint.timeout_secs == 0 {
            return Err(invalid("endpoint.timeout_secs", "must be at least 1 second"));
        }
        if self.device.name.trim().is_empty() {
            return Err(invalid("device.name", "must not be empty"));
        }
        if self.storage_key.is_empty() {
            return Err(invalid("storage_key", "must not be empty"));
        }

        let mut seen = std::collections::HashSet::new();
        for col in &self.columns {
            if col.key.is_empty() {
                return Err(invalid("columns", "column key must not be empty"));
            }
            if !seen.insert(col.key.as_str()) {
                return Err(invalid("columns", format!("duplicate column key '{}'", col.key)));
            }
        }

        if let Some(unknown) = self.default_visible.iter().find(|k| !seen.contains(k.as_str())) {
            return Err(invalid(
                "default_visible",
                format!("'{unknown}' is not a configured column"),
            ));
        }

        let mut color_rules = ColorRules::new();
        for (key, rule) in &self.color_rules {
            if !seen.contains(key.as_str()) {
                return Err(invalid(
                    format!("color_rules.{key}"),
                    "rule for a column that is not configured",
                ));
            }
            color_rules.insert(key.clone(), rule.compile(key)?);
        }

        let display_overrides: DisplayOverrides = self
            .display_overrides
            .iter()
            .map(|(raw, text)| (raw.clone(), text.clone()))
            .collect();

        Ok(DashboardConfig {
            base_url,
            timeout: Duration::from_secs(self.endpoint.timeout_secs),
            tls: if self.endpoint.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
            device_name: self.device.name.clone(),
            columns: self.columns.clone(),
            default_visible: self.default_visible.clone(),
            color_rules,
            display_overrides,
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            refresh_policy: self.refresh_policy,
            storage_key: self.storage_key.clone(),
            labels: self.labels.clone(),
        })
    }
}
