// `/devices` HTTP client
//
// Wraps `reqwest::Client` with base-URL resolution, status checking, and
// lenient payload extraction. One call = one GET; retries are left to the
// caller's polling schedule.

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::DevicesResponse;
use crate::query::DevicesQuery;
use crate::transport::TransportConfig;

/// Raw HTTP client for the telemetry endpoint.
#[derive(Debug, Clone)]
pub struct DevicesClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DevicesClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the endpoint root (e.g. `http://homeassistant.local:8099`);
    /// `/devices` is appended per request.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The endpoint base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full request URL for a query.
    pub fn devices_url(&self, query: &DevicesQuery) -> Url {
        query.to_url(&self.base_url)
    }

    /// Fetch and parse the device listing.
    ///
    /// Fails with [`Error::Request`] on a non-success status and
    /// [`Error::Deserialization`] when the body is not JSON. A JSON body
    /// without a `devices` array yields an empty listing.
    pub async fn fetch_devices(&self, query: &DevicesQuery) -> Result<DevicesResponse, Error> {
        let url = self.devices_url(query);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "devices request rejected");
            return Err(Error::Request {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "devices body received");

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            }
        })?;

        Ok(DevicesResponse::from_value(&value))
    }
}
