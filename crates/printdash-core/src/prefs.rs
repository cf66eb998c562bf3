// ── Preference storage ──
//
// Key/value string store for user preferences, plus the load/save pair for
// the column visibility selection. The file store keeps a single JSON object
// mapping storage keys to string values; each write rewrites the whole file.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{ColumnDef, VisibleSet};

/// Persistent string key/value storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

// ── File store ──────────────────────────────────────────────────────

/// JSON-object file, e.g. `~/.local/state/printdash/preferences.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Held across read-modify-rename; writers share one temp file.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| CoreError::Preferences {
            message: format!("{}: {e}", self.path.display()),
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entries = self.read_all().unwrap_or_else(|e| {
            warn!(error = %e, "preference file unreadable, starting fresh");
            BTreeMap::new()
        });
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(|e| CoreError::Preferences {
            message: e.to_string(),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), key, "preference saved");
        Ok(())
    }
}

// ── In-memory store ─────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.lock().map_err(|_| CoreError::Preferences {
            message: "memory store poisoned".into(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().map_err(|_| CoreError::Preferences {
            message: "memory store poisoned".into(),
        })?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// ── Visible set persistence ─────────────────────────────────────────

/// Load the stored selection, filtered to configured keys.
///
/// `None` means "no usable preference": the entry is missing or empty, the
/// store cannot be read, or the value is not a JSON array. Non-string array
/// elements are skipped. An empty array is a valid (empty) selection.
pub fn load_visible_set(
    store: &dyn PreferenceStore,
    key: &str,
    columns: &[ColumnDef],
) -> Option<VisibleSet> {
    let raw = match store.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => return None,
        Err(e) => {
            debug!(error = %e, "preference store unreadable, using defaults");
            return None;
        }
    };

    let serde_json::Value::Array(items) = serde_json::from_str(&raw).ok()? else {
        debug!(key, "stored visibility is not an array, using defaults");
        return None;
    };

    let mut set: VisibleSet = items
        .iter()
        .filter_map(serde_json::Value::as_str)
        .collect();
    set.retain_configured(columns);
    Some(set)
}

/// Store the selection as a JSON array string.
pub fn save_visible_set(
    store: &dyn PreferenceStore,
    key: &str,
    set: &VisibleSet,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(set).map_err(|e| CoreError::Preferences {
        message: e.to_string(),
    })?;
    store.set(key, &json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY: &str = "status2_visible_columns_v3";

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("_action", "Action"),
            ColumnDef::new("_dn", "Lid"),
            ColumnDef::new("_page", "Page"),
        ]
    }

    #[test]
    fn save_then_load_round_trips_filtered() {
        let store = MemoryStore::new();
        let set: VisibleSet = ["_page", "_gone", "_action"].into_iter().collect();
        save_visible_set(&store, KEY, &set).unwrap();

        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"["_page","_gone","_action"]"#)
        );

        let loaded = load_visible_set(&store, KEY, &columns()).unwrap();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["_page", "_action"]);
    }

    #[test]
    fn missing_or_invalid_entries_yield_none() {
        let store = MemoryStore::new();
        assert!(load_visible_set(&store, KEY, &columns()).is_none());

        store.set(KEY, "not json").unwrap();
        assert!(load_visible_set(&store, KEY, &columns()).is_none());

        store.set(KEY, r#"{"_dn":true}"#).unwrap();
        assert!(load_visible_set(&store, KEY, &columns()).is_none());

        store.set(KEY, "").unwrap();
        assert!(load_visible_set(&store, KEY, &columns()).is_none());
    }

    #[test]
    fn empty_array_is_a_valid_selection() {
        let store = MemoryStore::new();
        store.set(KEY, "[]").unwrap();
        let loaded = load_visible_set(&store, KEY, &columns()).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn other_storage_key_is_ignored() {
        let store = MemoryStore::new();
        store.set("status2_visible_columns_v2", r#"["_dn"]"#).unwrap();
        assert!(load_visible_set(&store, KEY, &columns()).is_none());
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state").join("preferences.json"));

        assert_eq!(store.get(KEY).unwrap(), None);
        store.set("other", "x").unwrap();
        store.set(KEY, r#"["_dn"]"#).unwrap();

        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
        let loaded = load_visible_set(&store, KEY, &columns()).unwrap();
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["_dn"]);
    }

    #[test]
    fn corrupt_file_reads_as_error_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{{{").unwrap();
        let store = FileStore::new(&path);

        assert!(store.get(KEY).is_err());
        assert!(load_visible_set(&store, KEY, &columns()).is_none());

        store.set(KEY, "[]").unwrap();
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn concurrent_file_writes_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path().join("preferences.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.set(&format!("key{i}"), "[]"))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        for i in 0..8 {
            assert_eq!(store.get(&format!("key{i}")).unwrap().as_deref(), Some("[]"));
        }
    }
}
