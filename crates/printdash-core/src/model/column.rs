use serde::{Deserialize, Serialize};

/// A configured metric column: stable key plus display label.
///
/// Column order everywhere (header, rows, filter panel) is the order of the
/// configured `Vec<ColumnDef>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub key: String,
    pub label: String,
}

impl ColumnDef {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}
