//! Everything that can happen in the app, as one message type.
//!
//! Input handlers and the data bridge only produce actions; state changes
//! happen when [`App`](crate::app::App) processes them.

use printdash_core::DashboardSnapshot;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Render,
    Resize(u16, u16),

    // ── Data ──
    /// The controller published a new snapshot.
    SnapshotUpdated(DashboardSnapshot),
    /// Run one refresh cycle now.
    Refresh,

    // ── Column filter ──
    ToggleFilter,
    CloseFilter,
    /// Show (`on`) or hide one column.
    ToggleColumn { key: String, on: bool },
    AllOn,
    AllOff,

    // ── UI ──
    ToggleHelp,
}
