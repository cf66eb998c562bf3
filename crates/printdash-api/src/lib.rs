// printdash-api: Async client for the printer telemetry `/devices` endpoint

pub mod client;
pub mod error;
pub mod models;
pub mod query;
pub mod transport;

pub use client::DevicesClient;
pub use error::Error;
pub use models::{DeviceEntry, DevicesResponse, Metric, Requested};
pub use query::DevicesQuery;
pub use transport::{TlsMode, TransportConfig};
