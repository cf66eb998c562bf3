#![allow(clippy::unwrap_used)]
// Integration tests for `DevicesClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use printdash_api::{DevicesClient, DevicesQuery, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DevicesClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DevicesClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn query() -> DevicesQuery {
    DevicesQuery::for_device("ComeTrue", ["_action", "_page"])
}

// ── Success ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_devices() {
    let (server, client) = setup().await;

    let body = json!({
        "generated_at": "2025-03-01T08:00:00+00:00",
        "requested": { "prefix": "sensor.cometrue_", "suffixes": ["_action", "_page"] },
        "devices": [
            {
                "device_id": "cometrue_001",
                "metrics": {
                    "_action": { "value": "printing", "last_updated": "2025-03-01T07:59:00Z" },
                    "_page": { "value": "3" }
                }
            },
            { "device_id": "cometrue_002", "metrics": {} }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("prefix", "sensor.cometrue_"))
        .and(query_param("suffix", "_action,_page"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let resp = client.fetch_devices(&query()).await.unwrap();

    assert_eq!(resp.devices.len(), 2);
    assert_eq!(resp.devices[0].device_id, "cometrue_001");
    assert_eq!(resp.devices[0].value("_action"), Some(&json!("printing")));
    assert_eq!(
        resp.devices[0].metrics["_action"].last_updated.as_deref(),
        Some("2025-03-01T07:59:00Z")
    );
    assert!(resp.devices[1].metrics.is_empty());
    assert_eq!(
        resp.generated_at.as_deref(),
        Some("2025-03-01T08:00:00+00:00")
    );
}

#[tokio::test]
async fn test_object_without_devices_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": null })))
        .mount(&server)
        .await;

    let resp = client.fetch_devices(&query()).await.unwrap();
    assert!(resp.devices.is_empty());
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let result = client.fetch_devices(&query()).await;

    match result {
        Err(err) => {
            assert!(
                matches!(err, Error::Request { status: 500 }),
                "expected Request error, got: {err:?}"
            );
            assert!(err.to_string().contains("500"));
        }
        Ok(resp) => panic!("expected Request error, got: {resp:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_devices(&query()).await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert_eq!(body, "<html>gateway</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = DevicesClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
    );

    let result = client.fetch_devices(&query()).await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}
