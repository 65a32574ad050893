//! Tests for basic handlers.

use axum::extract::State;
use gasmate_api::handlers::basic::*;
use gasmate_core::ChannelKind;

use crate::common::create_test_server;

#[tokio::test]
async fn test_health_handler() {
    let value = health_handler().await.0;
    assert_eq!(value["status"], "ok");
    assert_eq!(value["service"], "gasmate");
    assert!(value.get("version").is_some());
}

#[tokio::test]
async fn test_health_status_lists_channels() {
    let server = create_test_server();
    let status = health_status_handler(State(server.state.clone())).await.0;

    assert_eq!(status.status, "healthy");
    assert!(status.uptime >= 0);
    assert_eq!(status.channels.len(), ChannelKind::ALL.len());
    assert!(status.channels.iter().all(|c| c.configured));
    assert_eq!(status.running_monitors, 0);

    let sound = status
        .channels
        .iter()
        .find(|c| c.kind == ChannelKind::Sound)
        .unwrap();
    assert_eq!(sound.transport.as_deref(), Some("dashboard"));
}
