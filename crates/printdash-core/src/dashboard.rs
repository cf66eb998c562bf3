// ── Dashboard controller ──
//
// Owns the session's configuration, the user's column selection, and the
// published snapshot. A refresh cycle fetches `/devices`, rebuilds the table
// for the current selection, and publishes it through a `watch` channel;
// failures only replace the error line and leave the previous table in place.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Local};
use printdash_api::{DevicesClient, DevicesQuery};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{DashboardConfig, RefreshPolicy};
use crate::error::CoreError;
use crate::model::{ColumnDef, VisibleSet, rows_from_response};
use crate::prefs::{PreferenceStore, load_visible_set, save_visible_set};
use crate::view::{TableView, render_table};

/// Everything a host needs to draw the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Full request URL, echoed in the status line.
    pub source_url: String,
    pub refresh_interval: Duration,
    pub table: Arc<TableView>,
    pub count: usize,
    pub last_updated: Option<DateTime<Local>>,
    /// Localized error line from the latest failed cycle.
    pub error: Option<String>,
    pub in_flight: usize,
}

/// Result of a successful (or skipped) refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Rendered { rows: usize },
    /// Another cycle was in flight under [`RefreshPolicy::SkipIfInFlight`].
    Skipped,
}

/// The dashboard controller handle.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Hosts call
/// [`start()`](Self::start) once, observe [`subscribe()`](Self::subscribe),
/// and forward user actions to the toggle methods.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: DevicesClient,
    query: DevicesQuery,
    store: Arc<dyn PreferenceStore>,
    visible: RwLock<VisibleSet>,
    snapshot: watch::Sender<DashboardSnapshot>,
    in_flight: AtomicUsize,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build the controller and load the stored column selection (or the
    /// configured defaults). Does not fetch; call [`start()`](Self::start)
    /// or [`refresh()`](Self::refresh).
    pub fn new(config: DashboardConfig, store: Arc<dyn PreferenceStore>) -> Result<Self, CoreError> {
        let client = DevicesClient::new(config.base_url.clone(), &config.transport())?;
        let query = config.query();
        let source_url = client.devices_url(&query).to_string();

        let visible = load_visible_set(store.as_ref(), &config.storage_key, &config.columns)
            .unwrap_or_else(|| config.default_visible_set());
        debug!(visible = visible.len(), "column selection loaded");

        let (snapshot, _) = watch::channel(DashboardSnapshot {
            source_url,
            refresh_interval: config.refresh_interval,
            table: Arc::new(TableView::default()),
            count: 0,
            last_updated: None,
            error: None,
            in_flight: 0,
        });

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                query,
                store,
                visible: RwLock::new(visible),
                snapshot,
                in_flight: AtomicUsize::new(0),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn source_url(&self) -> String {
        self.inner.snapshot.borrow().source_url.clone()
    }

    // ── State observation ────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.inner.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn visible_set(&self) -> VisibleSet {
        self.read_visible()
    }

    /// Visible columns in definition order.
    pub fn visible_columns(&self) -> Vec<ColumnDef> {
        let visible = self.read_visible();
        visible
            .columns(&self.inner.config.columns)
            .into_iter()
            .cloned()
            .collect()
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Fetch, transform, and publish one table.
    ///
    /// On failure the snapshot keeps its previous table and gets the
    /// localized error line; the error is also returned to the caller.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let Some(_guard) = InFlight::enter(&self.inner) else {
            debug!("refresh skipped, cycle already in flight");
            return Ok(RefreshOutcome::Skipped);
        };

        self.inner.snapshot.send_modify(|s| s.error = None);

        match self.inner.client.fetch_devices(&self.inner.query).await {
            Ok(resp) => {
                let view = {
                    let visible = self.read_visible();
                    let columns = visible.columns(&self.inner.config.columns);
                    let rows = rows_from_response(&resp, &columns);
                    render_table(&self.inner.config, &visible, &rows)
                };
                let count = view.count();
                self.inner.snapshot.send_modify(|s| {
                    s.table = Arc::new(view);
                    s.count = count;
                    s.last_updated = Some(Local::now());
                });
                info!(rows = count, "dashboard refreshed");
                Ok(RefreshOutcome::Rendered { rows: count })
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "refresh failed");
                let message = format!("{}{err}", self.inner.config.labels.load_failed);
                self.inner.snapshot.send_modify(|s| s.error = Some(message));
                Err(err)
            }
        }
    }

    // ── Column visibility ────────────────────────────────────────

    /// Show or hide one column, persist the selection, and refresh.
    ///
    /// Unconfigured keys leave the selection untouched and return
    /// [`CoreError::UnknownColumn`] without refreshing.
    pub async fn toggle_field(&self, key: &str, on: bool) -> Result<RefreshOutcome, CoreError> {
        if !self.inner.config.is_configured(key) {
            debug!(key, "ignoring toggle for unconfigured column");
            return Err(CoreError::UnknownColumn { key: key.to_owned() });
        }
        self.update_visible(|v| {
            if on {
                v.insert(key);
            } else {
                v.remove(key);
            }
        });
        self.persist_or_warn();
        self.refresh().await
    }

    /// Show every configured column, persist, and refresh.
    pub async fn all_on(&self) -> Result<RefreshOutcome, CoreError> {
        let all = VisibleSet::all(&self.inner.config.columns);
        self.update_visible(|v| *v = all);
        self.persist_or_warn();
        self.refresh().await
    }

    /// Hide every column, persist, and refresh.
    pub async fn all_off(&self) -> Result<RefreshOutcome, CoreError> {
        self.update_visible(VisibleSet::clear);
        self.persist_or_warn();
        self.refresh().await
    }

    /// Change one column and persist without refreshing.
    ///
    /// Returns `true` if the selection changed. Unlike the interactive
    /// toggles, a failed write is returned.
    pub fn set_field(&self, key: &str, on: bool) -> Result<bool, CoreError> {
        if !self.inner.config.is_configured(key) {
            return Err(CoreError::UnknownColumn { key: key.to_owned() });
        }
        let mut changed = false;
        self.update_visible(|v| changed = if on { v.insert(key) } else { v.remove(key) });
        self.persist()?;
        Ok(changed)
    }

    /// Replace the whole selection and persist without refreshing.
    pub fn set_all(&self, on: bool) -> Result<(), CoreError> {
        let next = if on {
            VisibleSet::all(&self.inner.config.columns)
        } else {
            VisibleSet::new()
        };
        self.update_visible(|v| *v = next);
        self.persist()
    }

    /// Restore the configured default selection and persist.
    pub fn reset_visible(&self) -> Result<(), CoreError> {
        let defaults = self.inner.config.default_visible_set();
        self.update_visible(|v| *v = defaults);
        self.persist()
    }

    fn read_visible(&self) -> VisibleSet {
        match self.inner.visible.read() {
            Ok(v) => v.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update_visible(&self, f: impl FnOnce(&mut VisibleSet)) {
        let mut guard = match self.inner.visible.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }

    fn persist(&self) -> Result<(), CoreError> {
        let set = self.read_visible();
        save_visible_set(self.inner.store.as_ref(), &self.inner.config.storage_key, &set)
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to save column selection");
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the polling schedule: one immediate refresh, then one every
    /// `refresh_interval`. A zero interval runs the initial refresh only.
    pub async fn start(&self) {
        let period = self.inner.config.refresh_interval;
        let cancel = self.inner.cancel.child_token();
        info!(
            url = %self.source_url(),
            interval_secs = period.as_secs(),
            "dashboard polling started"
        );

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(refresh_task(self.clone(), period, cancel)));
    }

    /// Stop the polling schedule and wait for it to exit. In-flight fetches
    /// are not cancelled.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard polling stopped");
    }

    /// Spawn a single refresh cycle in the background.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let dashboard = self.clone();
        tokio::spawn(async move {
            // Failures are already published to the snapshot and logged.
            let _ = dashboard.refresh().await;
        })
    }
}

// ── In-flight accounting ────────────────────────────────────────────

struct InFlight<'a> {
    inner: &'a DashboardInner,
}

impl<'a> InFlight<'a> {
    /// Register a cycle. `None` when the policy forbids overlapping cycles
    /// and one is already running.
    fn enter(inner: &'a DashboardInner) -> Option<Self> {
        match inner.config.refresh_policy {
            RefreshPolicy::Overlap => {
                inner.in_flight.fetch_add(1, Ordering::SeqCst);
            }
            RefreshPolicy::SkipIfInFlight => {
                inner
                    .in_flight
                    .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
                    .ok()?;
            }
        }
        publish_in_flight(inner);
        Some(Self { inner })
    }
}

/// The counter is read under the snapshot lock so the last publish always
/// carries the current count.
fn publish_in_flight(inner: &DashboardInner) {
    inner
        .snapshot
        .send_modify(|s| s.in_flight = inner.in_flight.load(Ordering::SeqCst));
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
        publish_in_flight(self.inner);
    }
}

// ── Background task ─────────────────────────────────────────────────

/// Tick-driven refresh. Each cycle runs as its own task so a slow fetch
/// never delays the next tick.
async fn refresh_task(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    if period.is_zero() {
        dashboard.spawn_refresh();
        return;
    }

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                dashboard.spawn_refresh();
            }
        }
    }
}
