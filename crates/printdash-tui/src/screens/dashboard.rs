//! The dashboard screen: toolbar, status line, metrics table, and the
//! column filter popup.

use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use printdash_core::{ColumnDef, DashboardSnapshot, FilterPanel, TableBody, TableView, VisibleSet};

use crate::action::Action;
use crate::component::Component;
use crate::layout::{Button, DashboardLayout, TITLE, list_offset};
use crate::theme;
use crate::widgets::filter_popup;

const MAX_COLUMN_WIDTH: usize = 28;

pub struct DashboardScreen {
    columns: Vec<ColumnDef>,
    /// Local mirror of the controller's selection, used to rebuild the
    /// filter list without a round trip.
    visible: VisibleSet,
    filter: FilterPanel,
    snapshot: Option<DashboardSnapshot>,
    selected: usize,
    area: Rect,
}

impl DashboardScreen {
    pub fn new(columns: Vec<ColumnDef>, visible: VisibleSet) -> Self {
        Self {
            columns,
            visible,
            filter: FilterPanel::new(),
            snapshot: None,
            selected: 0,
            area: Rect::default(),
        }
    }

    #[cfg(test)]
    pub fn filter_open(&self) -> bool {
        self.filter.is_open()
    }

    fn layout(&self) -> DashboardLayout {
        DashboardLayout::new(self.area)
    }

    fn row_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.table.count())
    }

    fn scroll_rows(&mut self, delta: isize) {
        let last = self.row_count().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn filter_offset(&self) -> usize {
        let rows = self.layout().filter_rows(self.filter.entries().len());
        list_offset(self.filter.cursor(), rows)
    }

    fn toggle_selected_column(&mut self) -> Option<Action> {
        let (key, on) = self.filter.toggle_selected()?;
        Some(Action::ToggleColumn { key, on })
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CloseFilter),
            KeyCode::Char('j') | KeyCode::Down => {
                self.filter.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.filter.move_cursor(-1);
                None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.filter.select(0);
                None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.filter
                    .select(self.filter.entries().len().saturating_sub(1));
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected_column(),
            _ => Self::shared_key(key),
        }
    }

    fn shared_key(key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('c') => Some(Action::ToggleFilter),
            KeyCode::Char('a') => Some(Action::AllOn),
            KeyCode::Char('n') => Some(Action::AllOff),
            _ => None,
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Option<Action> {
        let layout = self.layout();
        let button = layout.button_at(column, row);

        if self.filter.is_open() {
            let entries = self.filter.entries().len();
            let inside = layout
                .filter_popup(entries)
                .contains(Position::new(column, row));
            if inside {
                let offset = self.filter_offset();
                let index = layout.filter_entry_at(entries, offset, column, row)?;
                self.filter.select(index);
                return self.toggle_selected_column();
            }
            self.filter.click(false, button == Some(Button::Columns));
        }

        button.map(Button::action)
    }

    fn handle_scroll(&mut self, delta: isize, column: u16, row: u16) {
        let layout = self.layout();
        let over_popup = self.filter.is_open()
            && layout
                .filter_popup(self.filter.entries().len())
                .contains(Position::new(column, row));
        if over_popup {
            self.filter.move_cursor(delta);
        } else {
            self.scroll_rows(delta);
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_toolbar(&self, frame: &mut Frame, layout: &DashboardLayout) {
        frame.render_widget(Span::styled(TITLE, theme::title_style()), layout.toolbar);
        for (button, rect) in layout.buttons() {
            let style = if button == Button::Columns && self.filter.is_open() {
                theme::button_active()
            } else {
                theme::button()
            };
            frame.render_widget(Span::styled(button.label(), style), rect);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(snap) = &self.snapshot else {
            return;
        };
        let sep = Span::styled(" │ ", theme::border_default());

        let schedule = if snap.refresh_interval.is_zero() {
            "manual refresh".to_owned()
        } else {
            format!("every {}", humantime::format_duration(snap.refresh_interval))
        };
        let updated = snap.last_updated.map_or_else(
            || "never".to_owned(),
            |ts| {
                let secs = u64::try_from((Local::now() - ts).num_seconds()).unwrap_or(0);
                format!(
                    "{} ({} ago)",
                    ts.format("%Y-%m-%d %H:%M:%S"),
                    humantime::format_duration(Duration::from_secs(secs))
                )
            },
        );

        let mut spans = vec![
            Span::styled(format!(" {}", snap.source_url), theme::status_bar()),
            sep.clone(),
            Span::styled(schedule, theme::status_bar()),
            sep.clone(),
            Span::styled(format!("{} rows", snap.count), theme::status_bar()),
            sep.clone(),
            Span::styled(format!("updated {updated}"), theme::status_bar()),
        ];
        if snap.in_flight > 0 {
            spans.push(sep);
            spans.push(Span::styled("loading…", theme::key_hint_key()));
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        if let Some(err) = self.snapshot.as_ref().and_then(|s| s.error.as_deref()) {
            block = block.title(
                Line::from(Span::styled(format!(" {err} "), theme::error_text())).right_aligned(),
            );
        }

        let loaded = self
            .snapshot
            .as_ref()
            .filter(|s| s.last_updated.is_some() || s.error.is_some());
        let Some(snap) = loaded else {
            let waiting = Paragraph::new("Waiting for the first refresh…")
                .style(theme::placeholder())
                .block(block);
            frame.render_widget(waiting, area);
            return;
        };
        let view: &TableView = &snap.table;

        let header = Row::new(
            view.header
                .iter()
                .map(|h| Cell::from(h.as_str()).style(theme::table_header())),
        );

        let rows: Vec<Row> = view
            .rows()
            .iter()
            .map(|r| {
                let device = Cell::from(r.device.as_str()).style(theme::table_row());
                let cells = r
                    .cells
                    .iter()
                    .map(|c| Cell::from(c.text.as_str()).style(theme::cell_class(c.class.as_deref())));
                Row::new(std::iter::once(device).chain(cells))
            })
            .collect();

        let table = Table::new(rows, column_widths(view))
            .header(header)
            .block(block)
            .column_spacing(2)
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default().with_selected((view.count() > 0).then_some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);

        if let TableBody::Placeholder { message, .. } = &view.body {
            // Inside the border, below the header row.
            let line = Rect::new(
                area.x.saturating_add(1),
                area.y.saturating_add(2),
                area.width.saturating_sub(2),
                1,
            )
            .intersection(area);
            frame.render_widget(
                Paragraph::new(message.as_str())
                    .style(theme::placeholder())
                    .centered(),
                line,
            );
        }
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(format!(" {label}  "), theme::key_hint()),
            ]
        };
        let spans: Vec<Span> = [
            hint("r", "refresh"),
            hint("c", "columns"),
            hint("a", "all on"),
            hint("n", "all off"),
            hint("?", "help"),
            hint("q", "quit"),
        ]
        .into_iter()
        .flatten()
        .collect();
        frame.render_widget(Line::from(spans), area);
    }
}

/// Fit each column to its widest cell, capped so one long value cannot
/// push the rest off screen.
fn column_widths(view: &TableView) -> Vec<Constraint> {
    let mut widths: Vec<usize> = view.header.iter().map(|h| Line::from(h.as_str()).width()).collect();
    for row in view.rows() {
        let texts = std::iter::once(row.device.as_str()).chain(row.cells.iter().map(|c| c.text.as_str()));
        for (w, text) in widths.iter_mut().zip(texts) {
            *w = (*w).max(Line::from(text).width());
        }
    }
    widths
        .into_iter()
        .map(|w| Constraint::Length(u16::try_from(w.min(MAX_COLUMN_WIDTH)).unwrap_or(u16::MAX)))
        .collect()
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.filter.is_open() {
            return Ok(self.handle_filter_key(key));
        }
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_rows(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_rows(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.row_count().saturating_sub(1);
                None
            }
            _ => Self::shared_key(key),
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            MouseEventKind::ScrollDown => {
                self.handle_scroll(1, mouse.column, mouse.row);
                None
            }
            MouseEventKind::ScrollUp => {
                self.handle_scroll(-1, mouse.column, mouse.row);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Resize(w, h) => self.area = Rect::new(0, 0, *w, *h),
            Action::SnapshotUpdated(snap) => {
                self.snapshot = Some(snap.clone());
                self.selected = self.selected.min(self.row_count().saturating_sub(1));
            }
            Action::ToggleFilter => self.filter.toggle(&self.columns, &self.visible),
            Action::CloseFilter => self.filter.close(),
            Action::ToggleColumn { key, on } => {
                if *on {
                    self.visible.insert(key.as_str());
                } else {
                    self.visible.remove(key);
                }
            }
            Action::AllOn => {
                self.visible = VisibleSet::all(&self.columns);
                self.filter.rebuild(&self.columns, &self.visible);
            }
            Action::AllOff => {
                self.visible.clear();
                self.filter.rebuild(&self.columns, &self.visible);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = DashboardLayout::new(area);
        self.render_toolbar(frame, &layout);
        self.render_status(frame, layout.status);
        self.render_table(frame, layout.table);
        Self::render_hints(frame, layout.hints);

        if self.filter.is_open() {
            let entries = self.filter.entries().len();
            let popup = layout.filter_popup(entries);
            let offset = list_offset(self.filter.cursor(), layout.filter_rows(entries));
            filter_popup::render(frame, popup, &self.filter, offset);
        }
    }

    fn id(&self) -> &str {
        "dashboard"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use printdash_core::{RenderedCell, RenderedRow};

    use super::*;

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("_action", "Action"),
            ColumnDef::new("_dn", "Lid"),
            ColumnDef::new("_p", "Waste"),
        ]
    }

    fn screen() -> DashboardScreen {
        let mut s = DashboardScreen::new(columns(), ["_action", "_p"].into_iter().collect());
        s.update(&Action::Resize(100, 24)).unwrap();
        s
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn open_filter(s: &mut DashboardScreen) {
        let action = s.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        assert!(matches!(action, Some(Action::ToggleFilter)));
        s.update(&Action::ToggleFilter).unwrap();
        assert!(s.filter_open());
    }

    fn snapshot(error: Option<&str>) -> DashboardSnapshot {
        let cell = |key: &str, text: &str, class: Option<&str>| RenderedCell {
            key: key.into(),
            text: text.into(),
            raw: text.into(),
            class: class.map(Into::into),
        };
        DashboardSnapshot {
            source_url: "http://printer.lan:8099/devices?prefix=sensor.cometrue_".into(),
            refresh_interval: Duration::from_secs(60),
            table: Arc::new(TableView {
                header: vec!["Device".into(), "Action".into(), "Waste".into()],
                body: TableBody::Rows {
                    rows: vec![RenderedRow {
                        device: "ComeTrue_1".into(),
                        cells: vec![cell("_action", "PRINTING", Some("c-ok")), cell("_p", "42", None)],
                    }],
                },
            }),
            count: 1,
            last_updated: Some(Local::now()),
            error: error.map(Into::into),
            in_flight: 0,
        }
    }

    fn draw(s: &DashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| s.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn space_toggles_the_entry_under_the_cursor() {
        let mut s = screen();
        open_filter(&mut s);

        s.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = s.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        match action {
            Some(Action::ToggleColumn { key, on }) => {
                assert_eq!(key, "_dn");
                assert!(on);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn escape_closes_the_filter() {
        let mut s = screen();
        open_filter(&mut s);
        let action = s.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(action, Some(Action::CloseFilter)));
        s.update(&Action::CloseFilter).unwrap();
        assert!(!s.filter_open());
    }

    #[test]
    fn click_outside_closes_and_still_presses_the_button() {
        let mut s = screen();
        open_filter(&mut s);
        let refresh = s.layout().button_rect(Button::Refresh);

        let action = s.handle_mouse_event(click(refresh.x, refresh.y)).unwrap();
        assert!(matches!(action, Some(Action::Refresh)));
        assert!(!s.filter_open());
    }

    #[test]
    fn click_on_trigger_leaves_closing_to_the_toggle() {
        let mut s = screen();
        open_filter(&mut s);
        let columns = s.layout().button_rect(Button::Columns);

        let action = s.handle_mouse_event(click(columns.x, columns.y)).unwrap();
        assert!(matches!(action, Some(Action::ToggleFilter)));
        assert!(s.filter_open());
        s.update(&Action::ToggleFilter).unwrap();
        assert!(!s.filter_open());
    }

    #[test]
    fn click_on_an_entry_toggles_it() {
        let mut s = screen();
        open_filter(&mut s);
        let popup = s.layout().filter_popup(3);

        let action = s.handle_mouse_event(click(popup.x + 2, popup.y + 3)).unwrap();
        match action {
            Some(Action::ToggleColumn { key, on }) => {
                assert_eq!(key, "_p");
                assert!(!on);
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(s.filter_open());
    }

    #[test]
    fn bulk_actions_rebuild_the_checkbox_list() {
        let mut s = screen();
        open_filter(&mut s);

        s.update(&Action::AllOff).unwrap();
        assert!(s.filter.entries().iter().all(|e| !e.checked));
        s.update(&Action::AllOn).unwrap();
        assert!(s.filter.entries().iter().all(|e| e.checked));
    }

    #[test]
    fn toolbar_keys_map_to_actions() {
        let mut s = screen();
        assert!(matches!(s.handle_key_event(key(KeyCode::Char('r'))).unwrap(), Some(Action::Refresh)));
        assert!(matches!(s.handle_key_event(key(KeyCode::Char('a'))).unwrap(), Some(Action::AllOn)));
        assert!(matches!(s.handle_key_event(key(KeyCode::Char('n'))).unwrap(), Some(Action::AllOff)));
        assert!(s.handle_key_event(key(KeyCode::Char('x'))).unwrap().is_none());
    }

    #[test]
    fn renders_rows_status_and_error() {
        let mut s = screen();
        s.update(&Action::SnapshotUpdated(snapshot(Some("load failed: HTTP 500"))))
            .unwrap();
        let screen = draw(&s);

        assert!(screen.contains("Refresh"));
        assert!(screen.contains("ComeTrue_1"));
        assert!(screen.contains("PRINTING"));
        assert!(screen.contains("every 1m"));
        assert!(screen.contains("1 rows"));
        assert!(screen.contains("load failed: HTTP 500"));
    }

    #[test]
    fn renders_placeholder_message() {
        let mut s = screen();
        let mut snap = snapshot(None);
        snap.table = Arc::new(TableView {
            header: vec!["Device".into()],
            body: TableBody::Placeholder {
                colspan: 1,
                message: "No data".into(),
            },
        });
        s.update(&Action::SnapshotUpdated(snap)).unwrap();
        assert!(draw(&s).contains("No data"));
    }
}
