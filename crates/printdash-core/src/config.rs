// ── Runtime dashboard configuration ──
//
// Describes *what* the dashboard polls and *how* it presents the result.
// Built by the config crate from TOML/env, or directly in tests. Static for
// the lifetime of a `Dashboard`.

use std::time::Duration;

use printdash_api::{DevicesQuery, TlsMode, TransportConfig};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::{ColorRules, ColumnDef, DisplayOverrides, VisibleSet};

/// What to do when a refresh is requested while another is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Run every cycle; the last one to finish wins the render.
    #[default]
    Overlap,
    /// Drop a cycle requested while one is in flight.
    SkipIfInFlight,
}

/// Localized UI strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub device_column: String,
    pub no_data: String,
    /// Prefix of the error line; the error text follows directly.
    pub load_failed: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            device_column: "裝置".into(),
            no_data: "無資料".into(),
            load_failed: "讀取失敗：".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Endpoint root; `/devices` is appended.
    pub base_url: Url,
    pub timeout: Duration,
    pub tls: TlsMode,
    /// Display-case device name, e.g. `ComeTrue`.
    pub device_name: String,
    pub columns: Vec<ColumnDef>,
    pub default_visible: Vec<String>,
    pub color_rules: ColorRules,
    pub display_overrides: DisplayOverrides,
    /// Zero disables the repeating schedule (initial refresh only).
    pub refresh_interval: Duration,
    pub refresh_policy: RefreshPolicy,
    /// Versioned preference key; changing it discards stored selections.
    pub storage_key: String,
    pub labels: Labels,
}

impl DashboardConfig {
    /// Minimal configuration for `base_url` with the given columns and no
    /// presentation rules.
    pub fn new(base_url: Url, device_name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        let default_visible = columns.iter().map(|c| c.key.clone()).collect();
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            tls: TlsMode::System,
            device_name: device_name.into(),
            columns,
            default_visible,
            color_rules: ColorRules::new(),
            display_overrides: DisplayOverrides::new(),
            refresh_interval: Duration::from_secs(60),
            refresh_policy: RefreshPolicy::Overlap,
            storage_key: "status2_visible_columns_v3".into(),
            labels: Labels::default(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls,
            timeout: self.timeout,
        }
    }

    /// Query for every configured column, regardless of visibility.
    pub fn query(&self) -> DevicesQuery {
        DevicesQuery::for_device(&self.device_name, self.columns.iter().map(|c| c.key.as_str()))
    }

    pub fn is_configured(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    /// Default visible set, restricted to configured keys.
    pub fn default_visible_set(&self) -> VisibleSet {
        let mut set: VisibleSet = self.default_visible.iter().cloned().collect();
        set.retain_configured(&self.columns);
        set
    }

    /// Device id with the first occurrence of the lowercase device-name
    /// token replaced by the display-case name.
    pub fn display_device_name(&self, device_id: &str) -> String {
        let token = self.device_name.to_lowercase();
        if token.is_empty() || !device_id.contains(&token) {
            return device_id.to_owned();
        }
        device_id.replacen(&token, &self.device_name, 1)
    }
}
