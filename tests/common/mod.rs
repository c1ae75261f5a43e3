//! Shared test utilities for SheSafe integration tests.
//!
//! Provides wire-format builders and a mocked backend so each test file
//! does not repeat the same fixtures.

#![allow(dead_code)]

use serde_json::{json, Value};
use shesafe::api::SheSafeApi;
use shesafe::client::HttpClient;
use shesafe::config::AlertLookup;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default per-request timeout for tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(2);

// =============================================================================
// Wire Builders
// =============================================================================

/// An alert as the backend serializes it.
pub fn alert_json(id: i64, alert_type: &str) -> Value {
    json!({
        "id": id,
        "alert_type": alert_type,
        "timestamp": "2024-01-01T20:00:00",
        "latitude": 28.6139,
        "longitude": 77.2090,
        "frame_path": format!("alerts/frame_{}.jpg", id),
        "male_count": 0,
        "female_count": 1,
        "gesture": null,
        "confidence": null
    })
}

/// A distress alert raised by a hand gesture.
pub fn gesture_alert_json(id: i64, gesture: &str) -> Value {
    let mut alert = alert_json(id, "distress");
    alert["gesture"] = json!(gesture);
    alert["confidence"] = json!(0.91);
    alert
}

/// Bytes that look like the start of a JPEG.
pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9]
}

// =============================================================================
// Backend Mocks
// =============================================================================

/// Client pointed at the mock server.
pub fn api_for(server: &MockServer) -> SheSafeApi {
    let client = HttpClient::with_client(&server.uri(), reqwest::Client::new(), TEST_TIMEOUT);
    SheSafeApi::from_client(client)
}

pub fn endpoint_api_for(server: &MockServer) -> SheSafeApi {
    api_for(server).with_alert_lookup(AlertLookup::Endpoint)
}

/// Mount a JSON response for `verb path`.
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount the alert list.
pub async fn mount_alerts(server: &MockServer, alerts: Vec<Value>) {
    mount_json(server, "GET", "/alerts", 200, Value::Array(alerts)).await;
}

/// Mount a frame for an alert.
pub async fn mount_image(server: &MockServer, id: i64, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/alert_image/{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(bytes),
        )
        .mount(server)
        .await;
}
