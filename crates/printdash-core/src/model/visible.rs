use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::ColumnDef;

/// The user's chosen column keys.
///
/// Kept in insertion order so the persisted list is stable; rendering order
/// always comes from the column definitions instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibleSet(IndexSet<String>);

impl VisibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every configured key, in column order.
    pub fn all(columns: &[ColumnDef]) -> Self {
        columns.iter().map(|c| c.key.clone()).collect()
    }

    /// Keep only keys present in `columns`.
    pub fn retain_configured(&mut self, columns: &[ColumnDef]) {
        self.0.retain(|k| columns.iter().any(|c| &c.key == k));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Returns `true` if the key was newly added.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    /// Returns `true` if the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Visible columns in definition order.
    pub fn columns<'a>(&self, columns: &'a [ColumnDef]) -> Vec<&'a ColumnDef> {
        columns.iter().filter(|c| self.contains(&c.key)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for VisibleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("_action", "Action"),
            ColumnDef::new("_dn", "Lid"),
            ColumnDef::new("_page", "Page"),
        ]
    }

    #[test]
    fn columns_follow_definition_order() {
        let cols = columns();
        let set: VisibleSet = ["_page", "_action"].into_iter().collect();
        let keys: Vec<_> = set.columns(&cols).iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["_action", "_page"]);
    }

    #[test]
    fn toggle_off_then_on_restores_position() {
        let cols = columns();
        let mut set = VisibleSet::all(&cols);
        assert!(set.remove("_action"));
        assert!(set.insert("_action"));
        let keys: Vec<_> = set.columns(&cols).iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["_action", "_dn", "_page"]);
    }

    #[test]
    fn retain_drops_unconfigured_keys() {
        let mut set: VisibleSet = ["_dn", "_gone"].into_iter().collect();
        set.retain_configured(&columns());
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["_dn"]);
    }
}
