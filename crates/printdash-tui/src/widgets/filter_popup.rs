//! Column filter popup: a bordered checkbox list drawn over the table.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use printdash_core::FilterPanel;

use crate::theme;

/// Draw `panel` into `area`, starting at entry `offset`.
pub fn render(frame: &mut Frame, area: Rect, panel: &FilterPanel, offset: usize) {
    let block = Block::default()
        .title(Span::styled(" Columns ", theme::title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = panel
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, entry)| {
            let mark = if entry.checked { "[x] " } else { "[ ] " };
            let style = if i == panel.cursor() {
                theme::table_selected()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(mark, theme::key_hint_key()),
                Span::styled(entry.label.as_str(), theme::table_row()),
            ])
            .style(style)
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
