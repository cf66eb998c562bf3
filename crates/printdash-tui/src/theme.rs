//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(56, 189, 248); // #38bdf8
pub const TEXT: Color = Color::Rgb(226, 232, 240); // #e2e8f0
pub const DIM_TEXT: Color = Color::Rgb(148, 163, 184); // #94a3b8
pub const BORDER_GRAY: Color = Color::Rgb(71, 85, 105); // #475569
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // #1e293b

// Cell classes. Same hues the add-on's stylesheet uses.
pub const OK_GREEN: Color = Color::Rgb(34, 197, 94); // #22c55e
pub const WARN_AMBER: Color = Color::Rgb(245, 158, 11); // #f59e0b
pub const BAD_RED: Color = Color::Rgb(239, 68, 68); // #ef4444
pub const INFO_BLUE: Color = Color::Rgb(59, 130, 246); // #3b82f6

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default().bg(BG_HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn placeholder() -> Style {
    Style::default().fg(DIM_TEXT).add_modifier(Modifier::ITALIC)
}

pub fn button() -> Style {
    Style::default().fg(TEXT).bg(BG_HIGHLIGHT)
}

pub fn button_active() -> Style {
    Style::default()
        .fg(BG_HIGHLIGHT)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn status_bar() -> Style {
    Style::default().fg(DIM_TEXT)
}

pub fn error_text() -> Style {
    Style::default().fg(BAD_RED).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::default().fg(DIM_TEXT)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Style for a cell's color class. Unknown classes render as plain text.
pub fn cell_class(class: Option<&str>) -> Style {
    match class {
        Some("c-ok") => Style::default().fg(OK_GREEN),
        Some("c-warn") => Style::default().fg(WARN_AMBER),
        Some("c-bad") => Style::default().fg(BAD_RED).add_modifier(Modifier::BOLD),
        Some("c-info") => Style::default().fg(INFO_BLUE),
        _ => table_row(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_classes_get_their_color() {
        assert_eq!(cell_class(Some("c-ok")).fg, Some(OK_GREEN));
        assert_eq!(cell_class(Some("c-warn")).fg, Some(WARN_AMBER));
        assert!(cell_class(Some("c-bad")).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn unknown_or_missing_class_is_plain() {
        assert_eq!(cell_class(Some("c-sparkle")), table_row());
        assert_eq!(cell_class(None), table_row());
    }
}
