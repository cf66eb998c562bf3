//! `printdash snapshot`: one refresh cycle, printed.

use chrono::{DateTime, Local};
use serde::Serialize;

use printdash_core::{Dashboard, DashboardSnapshot, TableBody, TableView};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SnapshotReport<'a> {
    source_url: &'a str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Local>>,
    table: &'a TableView,
}

fn table_text(snap: &DashboardSnapshot, color: bool) -> String {
    let view = &snap.table;
    let records: Vec<Vec<String>> = match &view.body {
        TableBody::Placeholder { colspan, message } => {
            let mut record = vec![message.clone()];
            record.resize(*colspan, String::new());
            vec![record]
        }
        TableBody::Rows { rows } => rows
            .iter()
            .map(|row| {
                std::iter::once(row.device.clone())
                    .chain(
                        row.cells
                            .iter()
                            .map(|c| output::paint_class(&c.text, c.class.as_deref(), color)),
                    )
                    .collect()
            })
            .collect(),
    };

    let updated = snap
        .last_updated
        .map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
    let footer = format!("{} rows · updated {updated} · {}", snap.count, snap.source_url);

    format!("{}\n{}", output::grid(&view.header, records), output::dim(&footer, color))
}

fn plain_text(snap: &DashboardSnapshot) -> String {
    snap.table
        .rows()
        .iter()
        .map(|row| {
            std::iter::once(row.device.as_str())
                .chain(row.cells.iter().map(|c| c.text.as_str()))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    dashboard.refresh().await?;
    let snap = dashboard.snapshot();
    let color = output::should_color(global.color);

    let report = SnapshotReport {
        source_url: &snap.source_url,
        count: snap.count,
        last_updated: snap.last_updated,
        table: &snap.table,
    };
    let out = output::render_single(
        global.output,
        &report,
        |_| table_text(&snap, color),
        |_| plain_text(&snap),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
