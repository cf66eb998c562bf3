//! Dashboard controller between `printdash-api` and UI hosts (CLI / TUI).
//!
//! - **[`Dashboard`]**: the controller handle. Owns the static
//!   [`DashboardConfig`], the user's [`VisibleSet`], and the published
//!   [`DashboardSnapshot`]. [`refresh()`](Dashboard::refresh) runs one fetch
//!   cycle; [`start()`](Dashboard::start) spawns the polling schedule.
//!
//! - **Presentation rules** ([`model`]): column definitions, the tagged
//!   [`ColorRule`] variant, display overrides, and the row transform.
//!
//! - **Render model** ([`view`]): the host-independent table that the TUI
//!   draws and the CLI prints.
//!
//! - **Preferences** ([`prefs`]): the [`PreferenceStore`] seam and the
//!   JSON-file store that keeps column visibility across sessions.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod model;
pub mod prefs;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, Labels, RefreshPolicy};
pub use dashboard::{Dashboard, DashboardSnapshot, RefreshOutcome};
pub use error::CoreError;
pub use filter::{FilterEntry, FilterPanel};
pub use model::{
    ColorRule, ColorRules, ColumnDef, DeviceRow, DisplayOverrides, MatchArm, RangeRule,
    Threshold, VisibleSet,
};
pub use prefs::{FileStore, MemoryStore, PreferenceStore};
pub use view::{RenderedCell, RenderedRow, TableBody, TableView};

pub use printdash_api::TlsMode;
