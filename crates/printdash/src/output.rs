//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits tab-separated lines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Paint a cell according to its color class, mirroring the dashboard's
/// stylesheet. Unknown classes are left unstyled.
pub fn paint_class(text: &str, class: Option<&str>, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match class {
        Some("c-ok") => text.green().to_string(),
        Some("c-warn") => text.yellow().to_string(),
        Some("c-bad") => text.red().bold().to_string(),
        Some("c-info") => text.blue().to_string(),
        _ => text.to_owned(),
    }
}

pub fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

pub fn success(text: &str, color: bool) -> String {
    if color {
        format!("{} {text}", "✓".green())
    } else {
        format!("✓ {text}")
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items in the chosen format.
///
/// `to_row` feeds the table view; `plain_fn` produces one line per item.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(plain_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item; `table_fn` draws the human-readable view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    table_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(table_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Build a rounded table from a header and string records.
pub fn grid(header: &[String], records: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().cloned());
    for record in records {
        builder.push_record(record);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Print to stdout unless quiet or empty.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Output(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_plain_without_color() {
        assert_eq!(paint_class("42", Some("c-bad"), false), "42");
        assert_eq!(paint_class("42", Some("c-other"), true), "42");
        assert!(paint_class("42", Some("c-ok"), true).contains("\u{1b}["));
    }

    #[test]
    fn grid_includes_header_and_records() {
        let out = grid(
            &["Device".to_owned(), "Page".to_owned()],
            [vec!["ComeTrue_1".to_owned(), "3".to_owned()]],
        );
        assert!(out.contains("Device"));
        assert!(out.contains("ComeTrue_1"));
        assert!(out.starts_with('╭'));
    }
}
