//! Screen geometry shared by rendering and mouse hit-testing.
//!
//! Both sides compute a [`DashboardLayout`] from the same terminal area, so
//! a click always lands on what was drawn there.

use ratatui::layout::{Constraint, Layout, Position, Rect};

use crate::action::Action;

pub const TITLE: &str = " printdash ";
const BUTTON_GAP: u16 = 1;
const POPUP_WIDTH: u16 = 34;

/// Toolbar buttons, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Refresh,
    Columns,
    AllOn,
    AllOff,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::Refresh, Self::Columns, Self::AllOn, Self::AllOff];

    pub fn label(self) -> &'static str {
        match self {
            Self::Refresh => " Refresh ",
            Self::Columns => " Columns ",
            Self::AllOn => " All on ",
            Self::AllOff => " All off ",
        }
    }

    pub fn action(self) -> Action {
        match self {
            Self::Refresh => Action::Refresh,
            Self::Columns => Action::ToggleFilter,
            Self::AllOn => Action::AllOn,
            Self::AllOff => Action::AllOff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub toolbar: Rect,
    pub status: Rect,
    pub table: Rect,
    pub hints: Rect,
    buttons: [(Button, Rect); 4],
}

impl DashboardLayout {
    pub fn new(area: Rect) -> Self {
        let [toolbar, status, table, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let mut x = toolbar.x.saturating_add(text_width(TITLE)).saturating_add(BUTTON_GAP);
        let right = toolbar.right();
        let buttons = Button::ALL.map(|button| {
            let start = x.min(right);
            let end = start.saturating_add(text_width(button.label())).min(right);
            x = end.saturating_add(BUTTON_GAP);
            (button, Rect::new(start, toolbar.y, end - start, toolbar.height))
        });

        Self {
            toolbar,
            status,
            table,
            hints,
            buttons,
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = (Button, Rect)> + '_ {
        self.buttons.iter().copied()
    }

    pub fn button_rect(&self, button: Button) -> Rect {
        self.buttons
            .iter()
            .find(|(b, _)| *b == button)
            .map(|(_, r)| *r)
            .unwrap_or_default()
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let pos = Position::new(column, row);
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(b, _)| *b)
    }

    /// Column popup, hung below the Columns button and kept on screen.
    pub fn filter_popup(&self, entries: usize) -> Rect {
        let area = self.table;
        let width = POPUP_WIDTH.min(area.width);
        let wanted = u16::try_from(entries).unwrap_or(u16::MAX).saturating_add(2);
        let height = wanted.min(area.height);

        let anchor = self.button_rect(Button::Columns).x;
        let x = anchor.min(area.right().saturating_sub(width)).max(area.x);
        Rect::new(x, area.y, width, height)
    }

    /// Rows available for entries inside the popup border.
    pub fn filter_rows(&self, entries: usize) -> usize {
        usize::from(self.filter_popup(entries).height.saturating_sub(2))
    }

    /// Entry index under a click, given the list's scroll offset.
    pub fn filter_entry_at(&self, entries: usize, offset: usize, column: u16, row: u16) -> Option<usize> {
        let popup = self.filter_popup(entries);
        let inner = Rect::new(
            popup.x.saturating_add(1),
            popup.y.saturating_add(1),
            popup.width.saturating_sub(2),
            popup.height.saturating_sub(2),
        );
        if !inner.contains(Position::new(column, row)) {
            return None;
        }
        let index = offset + usize::from(row - inner.y);
        (index < entries).then_some(index)
    }
}

/// First visible entry so that `cursor` stays on screen.
pub fn list_offset(cursor: usize, rows: usize) -> usize {
    if rows == 0 {
        return cursor;
    }
    cursor.saturating_sub(rows - 1)
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layout(w: u16, h: u16) -> DashboardLayout {
        DashboardLayout::new(Rect::new(0, 0, w, h))
    }

    #[test]
    fn rows_are_stacked() {
        let l = layout(80, 24);
        assert_eq!(l.toolbar, Rect::new(0, 0, 80, 1));
        assert_eq!(l.status, Rect::new(0, 1, 80, 1));
        assert_eq!(l.table, Rect::new(0, 2, 80, 21));
        assert_eq!(l.hints, Rect::new(0, 23, 80, 1));
    }

    #[test]
    fn buttons_follow_the_title_without_overlap() {
        let l = layout(80, 24);
        let rects: Vec<Rect> = l.buttons().map(|(_, r)| r).collect();
        assert_eq!(rects[0].x, 12);
        for pair in rects.windows(2) {
            assert!(pair[0].right() < pair[1].x);
        }
        assert_eq!(l.button_rect(Button::Columns).width, 9);
    }

    #[test]
    fn clicks_hit_the_drawn_button() {
        let l = layout(80, 24);
        let refresh = l.button_rect(Button::Refresh);
        let columns = l.button_rect(Button::Columns);

        assert_eq!(l.button_at(refresh.x, 0), Some(Button::Refresh));
        assert_eq!(l.button_at(columns.right() - 1, 0), Some(Button::Columns));
        assert_eq!(l.button_at(columns.right(), 0), None);
        assert_eq!(l.button_at(refresh.x, 1), None);
        assert_eq!(l.button_at(0, 0), None);
    }

    #[test]
    fn narrow_terminal_clips_buttons() {
        let l = layout(30, 10);
        assert_eq!(l.button_rect(Button::Columns).right(), 30);
        assert_eq!(l.button_at(29, 0), Some(Button::Columns));
        assert_eq!(l.button_rect(Button::AllOff).width, 0);
    }

    #[test]
    fn popup_sits_under_columns_and_stays_on_screen() {
        let l = layout(80, 24);
        let popup = l.filter_popup(23);
        assert_eq!(popup.x, l.button_rect(Button::Columns).x);
        assert_eq!(popup.y, l.table.y);
        assert_eq!(popup.height, l.table.height);

        let narrow = layout(40, 24);
        let popup = narrow.filter_popup(3);
        assert_eq!(popup.height, 5);
        assert!(popup.right() <= 40);
    }

    #[test]
    fn popup_entries_are_hit_with_scroll_offset() {
        let l = layout(80, 24);
        let popup = l.filter_popup(5);
        let first_row = popup.y + 1;
        let col = popup.x + 2;

        assert_eq!(l.filter_entry_at(5, 0, col, first_row), Some(0));
        assert_eq!(l.filter_entry_at(5, 0, col, first_row + 4), Some(4));
        assert_eq!(l.filter_entry_at(5, 0, col, popup.y), None);
        assert_eq!(l.filter_entry_at(5, 0, popup.x, first_row), None);
        assert_eq!(l.filter_entry_at(40, 10, col, first_row + 2), Some(12));
    }

    #[test]
    fn offset_keeps_cursor_visible() {
        assert_eq!(list_offset(3, 10), 0);
        assert_eq!(list_offset(9, 10), 0);
        assert_eq!(list_offset(10, 10), 1);
        assert_eq!(list_offset(22, 19), 4);
    }
}
