// Wire models for the `/devices` response.
//
// The endpoint is a thin aggregator over a home-automation state API and
// its payload shape is not guaranteed: a missing or non-array `devices`
// field means "no devices", and a malformed device entry degrades to
// empty fields rather than failing the whole response. Parsing therefore
// goes through `serde_json::Value` instead of a strict derive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Echo of the filter the endpoint applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requested {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

/// A single metric reading for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metric {
    /// Raw state value; `Value::Null` when absent.
    pub value: Value,
    /// ISO-8601 timestamp of the last state change, when reported.
    pub last_updated: Option<String>,
}

impl Metric {
    fn from_value(raw: &Value) -> Self {
        Self {
            value: raw.get("value").cloned().unwrap_or(Value::Null),
            last_updated: raw
                .get("last_updated")
                .and_then(Value::as_str)
                .map(String::from),
        }
    }
}

/// One device as grouped by the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceEntry {
    pub device_id: String,
    pub metrics: HashMap<String, Metric>,
}

impl DeviceEntry {
    fn from_value(raw: &Value) -> Self {
        let device_id = match raw.get("device_id") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        let metrics = raw
            .get("metrics")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), Metric::from_value(v)))
                    .collect()
            })
            .unwrap_or_default();
        Self { device_id, metrics }
    }

    /// Raw value of a metric; `None` when the metric is absent or null.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.metrics
            .get(key)
            .map(|m| &m.value)
            .filter(|v| !v.is_null())
    }
}

/// Parsed `GET /devices` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DevicesResponse {
    pub generated_at: Option<String>,
    pub requested: Option<Requested>,
    pub devices: Vec<DeviceEntry>,
}

impl DevicesResponse {
    /// Leniently extract the response from an arbitrary JSON document.
    pub fn from_value(raw: &Value) -> Self {
        let devices = raw
            .get("devices")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(DeviceEntry::from_value).collect())
            .unwrap_or_default();
        Self {
            generated_at: raw
                .get("generated_at")
                .and_then(Value::as_str)
                .map(String::from),
            requested: raw
                .get("requested")
                .and_then(|r| Requested::deserialize(r).ok()),
            devices,
        }
    }
}
