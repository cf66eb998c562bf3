// Column filter panel state.
//
// Pure state machine: the host decides where the panel and its trigger are
// drawn and reports clicks and keys here. The checkbox list is a snapshot
// taken when the panel opens (or after a bulk action); individual toggles
// update their own entry in place.

use crate::model::{ColumnDef, VisibleSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    open: bool,
    entries: Vec<FilterEntry>,
    cursor: usize,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&FilterEntry> {
        self.entries.get(self.cursor)
    }

    /// Rebuild the checkbox list from the current selection.
    pub fn rebuild(&mut self, columns: &[ColumnDef], visible: &VisibleSet) {
        self.entries = columns
            .iter()
            .map(|c| FilterEntry {
                key: c.key.clone(),
                label: c.label.clone(),
                checked: visible.contains(&c.key),
            })
            .collect();
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    /// Trigger button pressed: close if open, otherwise rebuild and open.
    pub fn toggle(&mut self, columns: &[ColumnDef], visible: &VisibleSet) {
        if self.open {
            self.open = false;
        } else {
            self.rebuild(columns, visible);
            self.open = true;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// A click landed somewhere. Closes the panel unless the click was
    /// inside it or on its trigger. Returns `true` if the panel closed.
    pub fn click(&mut self, inside_panel: bool, on_trigger: bool) -> bool {
        if self.open && !inside_panel && !on_trigger {
            self.open = false;
            return true;
        }
        false
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn select(&mut self, index: usize) {
        if index < self.entries.len() {
            self.cursor = index;
        }
    }

    /// Flip the entry under the cursor. Returns the key and its new state.
    pub fn toggle_selected(&mut self) -> Option<(String, bool)> {
        let entry = self.entries.get_mut(self.cursor)?;
        entry.checked = !entry.checked;
        Some((entry.key.clone(), entry.checked))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
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
    fn opening_rebuilds_from_current_selection() {
        let cols = columns();
        let mut panel = FilterPanel::new();
        let visible: VisibleSet = ["_dn"].into_iter().collect();

        panel.toggle(&cols, &visible);
        assert!(panel.is_open());
        let checked: Vec<_> = panel.entries().iter().map(|e| e.checked).collect();
        assert_eq!(checked, vec![false, true, false]);

        panel.toggle(&cols, &visible);
        assert!(!panel.is_open());
    }

    #[test]
    fn click_outside_closes_but_trigger_and_inside_do_not() {
        let cols = columns();
        let mut panel = FilterPanel::new();
        panel.toggle(&cols, &VisibleSet::new());

        assert!(!panel.click(true, false));
        assert!(panel.is_open());
        assert!(!panel.click(false, true));
        assert!(panel.is_open());
        assert!(panel.click(false, false));
        assert!(!panel.is_open());
    }

    #[test]
    fn cursor_is_clamped_and_toggles_entry() {
        let cols = columns();
        let mut panel = FilterPanel::new();
        panel.toggle(&cols, &VisibleSet::all(&cols));

        panel.move_cursor(-1);
        assert_eq!(panel.cursor(), 0);
        panel.move_cursor(5);
        assert_eq!(panel.cursor(), 2);

        assert_eq!(panel.toggle_selected(), Some(("_page".into(), false)));
        assert!(!panel.selected().unwrap().checked);
    }
}
