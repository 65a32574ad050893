//! Tests that go through the full router over HTTP.

use std::time::Duration;

use gasmate_api::{create_router, ServerState};
use serde_json::{json, Value};

use crate::common::*;

async fn spawn_app(state: ServerState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health_route() {
    let server = create_test_server();
    let base = spawn_app(server.state.clone()).await;

    let response = reqwest::get(format!("{}/api/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_malformed_alert_body_is_400() {
    let server = create_test_server();
    let base = spawn_app(server.state.clone()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/notifications/alert", base))
        .bearer_auth(TOKEN)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let response = client
        .post(format!("{}/api/notifications/alert", base))
        .bearer_auth(TOKEN)
        .json(&json!({ "alertId": "x", "gasLevel": 5.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert_eq!(server.transport_calls().await, 0);
}

#[tokio::test]
async fn test_invalid_token_wire_shape() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let base = spawn_app(server.state.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/notifications/alert", base))
        .bearer_auth("forged")
        .json(&json!({
            "alertId": gasmate_core::AlertId::new().to_string(),
            "gasLevel": 5.0,
            "timestamp": "2024-03-01T08:00:00Z",
            "isLeak": false,
            "alertType": "critical",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "code": "UNAUTHORIZED",
            "message": "Unauthorized: Invalid ID token",
        })
    );
    assert_eq!(server.transport_calls().await, 0);
}

#[tokio::test]
async fn test_cors_preflight_allows_dashboard_origin() {
    let server = create_test_server();
    let base = spawn_app(server.state.clone()).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/api/alerts", base))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_sound_stream_delivers_cue() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let base = spawn_app(server.state.clone()).await;
    let client = reqwest::Client::new();

    let mut stream = client
        .get(format!("{}/api/notifications/sound/stream", base))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), 200);

    let response = client
        .post(format!("{}/api/notifications/test/sound", base))
        .bearer_auth(TOKEN)
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let chunk = tokio::time::timeout(Duration::from_secs(5), stream.chunk())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8_lossy(&chunk);
    assert!(text.contains("event: sound"));
    assert!(text.contains(ACCOUNT));
}
