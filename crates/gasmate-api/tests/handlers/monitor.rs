//! Tests for reading monitor handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gasmate_api::handlers::monitor::*;
use gasmate_api::HmacIdentityVerifier;
use gasmate_core::{AlertKind, Reading};

use crate::common::*;

async fn wait_for_alerts(server: &TestServer, expected: usize) -> usize {
    for _ in 0..100 {
        let count = server.state.stores.alerts.count(ACCOUNT).unwrap();
        if count >= expected {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    server.state.stores.alerts.count(ACCOUNT).unwrap()
}

#[tokio::test]
async fn test_monitor_raises_on_escalation() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    let Json(value) = start_monitor_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["accountId"], ACCOUNT);
    assert_eq!(value["replaced"], false);

    for v in [1.0, 5.0, 5.5] {
        server.state.feed.publish(Reading::new(v, false));
    }
    assert_eq!(wait_for_alerts(&server, 1).await, 1);

    server.state.feed.publish(Reading::new(7.0, true));
    assert_eq!(wait_for_alerts(&server, 2).await, 2);

    let mut alerts = Vec::new();
    for _ in 0..100 {
        alerts = server
            .state
            .pipeline
            .recorder()
            .list_alerts(ACCOUNT, None)
            .await
            .unwrap();
        if alerts.iter().all(|a| a.is_finalized()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(alerts.len(), 2);
    assert!(alerts.iter().all(|a| a.is_finalized()));
    assert_eq!(alerts[0].kind, AlertKind::Danger);
    assert_eq!(alerts[1].kind, AlertKind::Critical);
    assert_eq!(server.push.count().await, 2);
}

#[tokio::test]
async fn test_start_replaces_and_stop_cancels() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    start_monitor_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    let Json(value) = start_monitor_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["replaced"], true);
    assert_eq!(server.state.monitors.len(), 1);

    let Json(value) = monitor_status_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["running"], true);

    let Json(value) = stop_monitor_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["stopped"], true);

    let mut released = false;
    for _ in 0..100 {
        if server.state.feed.subscriber_count() == 0 {
            released = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(released);

    let Json(value) = monitor_status_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["running"], false);

    let Json(value) = stop_monitor_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["stopped"], false);
}

#[tokio::test]
async fn test_monitor_requires_identity() {
    let server = create_test_server();
    let err = start_monitor_handler(State(server.state.clone()), auth("forged"))
        .await
        .unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    assert!(server.state.monitors.is_empty());
}

#[tokio::test]
async fn test_monitor_outlives_its_token() {
    let verifier = HmacIdentityVerifier::new("monitor-secret");
    let token = verifier.issue(ACCOUNT, chrono::Duration::seconds(1)).unwrap();
    let server = create_test_server_with_verifier(Arc::new(verifier));
    server.configure(ACCOUNT);

    start_monitor_handler(State(server.state.clone()), auth(&token))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let err = monitor_status_handler(State(server.state.clone()), auth(&token))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);

    server.state.feed.publish(Reading::new(7.0, false));
    assert_eq!(wait_for_alerts(&server, 1).await, 1);
    assert!(server.state.monitors.get(ACCOUNT).unwrap().is_running());
}
