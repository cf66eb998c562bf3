// Device rows: one per device in a `/devices` response, holding the
// formatted raw value of every currently visible column.

use indexmap::IndexMap;
use printdash_api::DevicesResponse;
use serde_json::{Number, Value};

use super::ColumnDef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRow {
    /// Device identifier as reported (not yet display-cased).
    pub device: String,
    /// Column key → formatted raw value, in column order. Missing metrics
    /// are stored as `""`.
    pub values: IndexMap<String, String>,
}

impl DeviceRow {
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }
}

/// Build rows for the given visible columns.
pub fn rows_from_response(resp: &DevicesResponse, columns: &[&ColumnDef]) -> Vec<DeviceRow> {
    resp.devices
        .iter()
        .map(|dev| DeviceRow {
            device: dev.device_id.clone(),
            values: columns
                .iter()
                .map(|col| (col.key.clone(), format_value(dev.value(&col.key))))
                .collect(),
        })
        .collect()
}

/// Text form of a raw metric value.
///
/// Absent and null are `""`, strings are verbatim, booleans and numbers use
/// their JSON text except that whole floats drop the `.0`. Arrays join their elements with `,`; objects render as
/// `[object Object]`.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => format_number(n),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| format_value(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_owned(),
    }
}

/// Whole floats print without a fraction (`100.0` as `100`) so text rules
/// see the same string an integer would produce.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_owned()
            } else {
                format!("{f:.0}")
            }
        }
        _ => n.to_string(),
    }
}
