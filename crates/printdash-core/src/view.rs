// Host-independent render model of the metrics table.
//
// `render_table` applies the presentation rules (device name recasing,
// display overrides, color classes) once, so the TUI and the CLI show the
// same thing.

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::model::{DeviceRow, VisibleSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub key: String,
    /// Text to display (override applied).
    pub text: String,
    /// Raw value the class was computed from.
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub device: String,
    pub cells: Vec<RenderedCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableBody {
    /// Single full-width row shown when there are no devices.
    Placeholder { colspan: usize, message: String },
    Rows { rows: Vec<RenderedRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Device column label followed by the visible column labels.
    pub header: Vec<String>,
    pub body: TableBody,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            header: Vec::new(),
            body: TableBody::Rows { rows: Vec::new() },
        }
    }
}

impl TableView {
    /// Number of device rows; zero for the placeholder.
    pub fn count(&self) -> usize {
        match &self.body {
            TableBody::Placeholder { .. } => 0,
            TableBody::Rows { rows } => rows.len(),
        }
    }

    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Placeholder { .. } => &[],
            TableBody::Rows { rows } => rows,
        }
    }
}

/// Render rows for the currently visible columns.
pub fn render_table(config: &DashboardConfig, visible: &VisibleSet, rows: &[DeviceRow]) -> TableView {
    let columns = visible.columns(&config.columns);

    let header = std::iter::once(config.labels.device_column.clone())
        .chain(columns.iter().map(|c| c.label.clone()))
        .collect();

    if rows.is_empty() {
        return TableView {
            header,
            body: TableBody::Placeholder {
                colspan: 1 + columns.len(),
                message: config.labels.no_data.clone(),
            },
        };
    }

    let rows = rows
        .iter()
        .map(|row| RenderedRow {
            device: config.display_device_name(&row.device),
            cells: columns
                .iter()
                .map(|col| {
                    let raw = row.value(&col.key);
                    RenderedCell {
                        key: col.key.clone(),
                        text: config.display_overrides.display(raw).to_owned(),
                        raw: raw.to_owned(),
                        class: config.color_rules.cell_class(&col.key, Some(raw)),
                    }
                })
                .collect(),
        })
        .collect();

    TableView {
        header,
        body: TableBody::Rows { rows },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ColorRule, ColumnDef, RangeRule};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn config() -> DashboardConfig {
        let mut cfg = DashboardConfig::new(
            Url::parse("http://printer.local:8099").unwrap(),
            "ComeTrue",
            vec![
                ColumnDef::new("_action", "動作"),
                ColumnDef::new("_dn", "上蓋"),
                ColumnDef::new("_p", "廢粉"),
            ],
        );
        cfg.color_rules.insert(
            "_action",
            ColorRule::matching([("unavailable", "c-warn"), ("Disconnect", "c-bad")]),
        );
        cfg.color_rules.insert(
            "_p",
            ColorRule::Ranges(vec![RangeRule { min: 0.0, max: 50.0, class: "c-ok".into() }]),
        );
        cfg.display_overrides.insert("unavailable", "軟體離線");
        cfg
    }

    fn row(device: &str, values: &[(&str, &str)]) -> DeviceRow {
        DeviceRow {
            device: device.into(),
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn empty_rows_render_placeholder() {
        let cfg = config();
        let visible: VisibleSet = ["_action", "_p"].into_iter().collect();
        let view = render_table(&cfg, &visible, &[]);

        assert_eq!(view.header, vec!["裝置", "動作", "廢粉"]);
        assert_eq!(
            view.body,
            TableBody::Placeholder { colspan: 3, message: "無資料".into() }
        );
        assert_eq!(view.count(), 0);
    }

    #[test]
    fn hidden_columns_are_omitted_everywhere() {
        let cfg = config();
        let visible: VisibleSet = ["_p", "_action"].into_iter().collect();
        let view = render_table(
            &cfg,
            &visible,
            &[row("cometrue_1", &[("_action", "Printing"), ("_p", "10")])],
        );

        assert_eq!(view.header, vec!["裝置", "動作", "廢粉"]);
        let keys: Vec<_> = view.rows()[0].cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["_action", "_p"]);
        assert!(!view.header.contains(&"上蓋".to_string()));
    }

    #[test]
    fn override_changes_text_but_not_class() {
        let cfg = config();
        let visible: VisibleSet = ["_action"].into_iter().collect();
        let view = render_table(
            &cfg,
            &visible,
            &[row("cometrue_1", &[("_action", "unavailable")])],
        );

        let cell = &view.rows()[0].cells[0];
        assert_eq!(cell.text, "軟體離線");
        assert_eq!(cell.raw, "unavailable");
        assert_eq!(cell.class.as_deref(), Some("c-warn"));
    }

    #[test]
    fn device_name_and_range_classes() {
        let cfg = config();
        let visible: VisibleSet = ["_p"].into_iter().collect();
        let view = render_table(
            &cfg,
            &visible,
            &[
                row("cometrue_1", &[("_p", "30")]),
                row("cometrue_2", &[("_p", "51")]),
            ],
        );

        assert_eq!(view.count(), 2);
        assert_eq!(view.rows()[0].device, "ComeTrue_1");
        assert_eq!(view.rows()[0].cells[0].class.as_deref(), Some("c-ok"));
        assert_eq!(view.rows()[1].cells[0].class, None);
    }

    #[test]
    fn serializes_with_tagged_body() {
        let cfg = config();
        let view = render_table(&cfg, &VisibleSet::new(), &[]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["body"]["kind"], "placeholder");
        assert_eq!(json["body"]["colspan"], 1);
    }
}
