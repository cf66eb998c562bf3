//! Data bridge: starts the dashboard's polling schedule and forwards every
//! published snapshot to the TUI as an [`Action`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use printdash_core::Dashboard;

use crate::action::Action;

/// Runs until `cancel` fires or the app stops listening, then stops the
/// dashboard's schedule.
pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshots = dashboard.subscribe();
    let initial = snapshots.borrow_and_update().clone();
    let _ = action_tx.send(Action::SnapshotUpdated(initial));

    dashboard.start().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if action_tx.send(Action::SnapshotUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    dashboard.shutdown().await;
    debug!("data bridge stopped");
}
