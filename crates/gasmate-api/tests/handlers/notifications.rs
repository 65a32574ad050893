//! Tests for notification handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gasmate_api::handlers::notifications::*;
use gasmate_core::{AlertKind, AlertRecord, ChannelKind, Reading};
use gasmate_messages::MemoryChannel;

use crate::common::*;

async fn pending_alert(server: &TestServer, value: f64, is_leak: bool, kind: AlertKind) -> AlertRecord {
    server
        .state
        .pipeline
        .recorder()
        .record_alert(ACCOUNT, &Reading::new(value, is_leak), kind)
        .await
        .unwrap()
}

fn request_for(record: &AlertRecord) -> AlertNotificationRequest {
    AlertNotificationRequest {
        alert_id: record.id.to_string(),
        gas_level: record.gas_level,
        timestamp: record.timestamp,
        is_leak: record.is_leak,
        alert_type: record.kind.as_str().to_string(),
    }
}

#[tokio::test]
async fn test_alert_fanout_attempts_every_channel() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    let Json(value) = alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap();

    assert_eq!(value["success"], true);
    let notifications = value["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 4);
    for outcome in notifications {
        let expected = if outcome["type"] == "sound" { "failed" } else { "sent" };
        assert_eq!(outcome["status"], expected);
    }

    let push = server.push.deliveries().await;
    assert_eq!(push.len(), 1);
    assert!(push[0].content.text.contains("CRITICAL"));
    assert!(!push[0].content.text.contains("Gas leak detected"));

    let stored = server
        .state
        .pipeline
        .recorder()
        .get_alert(ACCOUNT, &record.id)
        .await
        .unwrap();
    assert!(stored.is_finalized());
    assert_eq!(stored.failed_channels(), vec![ChannelKind::Sound]);
}

#[tokio::test]
async fn test_danger_leak_body() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 7.0, true, AlertKind::Danger).await;

    alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap();

    let text = &server.whatsapp.deliveries().await[0].content.text;
    assert!(text.contains("DANGER"));
    assert!(text.contains("Gas leak detected"));
}

#[tokio::test]
async fn test_whatsapp_failure_is_isolated() {
    let server = create_test_server_with(
        MemoryChannel::new(ChannelKind::WhatsApp)
            .failing("The 'To' number abc is not a valid phone number."),
    );
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    let Json(value) = alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap();

    let notifications = value["notifications"].as_array().unwrap();
    let whatsapp = notifications.iter().find(|o| o["type"] == "whatsapp").unwrap();
    assert_eq!(whatsapp["status"], "failed");
    assert_eq!(
        whatsapp["error"],
        "The 'To' number abc is not a valid phone number."
    );
    let push = notifications.iter().find(|o| o["type"] == "push").unwrap();
    assert_eq!(push["status"], "sent");
}

#[tokio::test]
async fn test_invalid_token_is_500_and_sends_nothing() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    for headers in [auth("forged"), no_auth()] {
        let err = alert_notification_handler(
            State(server.state.clone()),
            headers,
            Ok(Json(request_for(&record))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "UNAUTHORIZED");
    }

    assert_eq!(server.transport_calls().await, 0);
    let stored = server
        .state
        .pipeline
        .recorder()
        .get_alert(ACCOUNT, &record.id)
        .await
        .unwrap();
    assert!(!stored.is_finalized());
}

#[tokio::test]
async fn test_missing_settings_is_500() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    // acct-2 has no settings document.
    let err = alert_notification_handler(
        State(server.state.clone()),
        auth(OTHER_TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code, "CONFIGURATION_MISSING");
    assert_eq!(server.transport_calls().await, 0);
}

#[tokio::test]
async fn test_unknown_alert_type_is_400() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;
    let mut request = request_for(&record);
    request.alert_type = "warning".to_string();

    let err = alert_notification_handler(State(server.state.clone()), auth(TOKEN), Ok(Json(request)))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(server.transport_calls().await, 0);
}

#[tokio::test]
async fn test_unknown_alert_is_404() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    let mut request = request_for(&record);
    request.alert_id = gasmate_core::AlertId::new().to_string();
    let err = alert_notification_handler(State(server.state.clone()), auth(TOKEN), Ok(Json(request)))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);

    let mut request = request_for(&record);
    request.alert_id = "not-a-uuid".to_string();
    let err = alert_notification_handler(State(server.state.clone()), auth(TOKEN), Ok(Json(request)))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(server.transport_calls().await, 0);
}

#[tokio::test]
async fn test_second_fanout_is_409() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let record = pending_alert(&server, 5.0, false, AlertKind::Critical).await;

    alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap();
    let calls = server.transport_calls().await;

    let err = alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(server.transport_calls().await, calls);
}

#[tokio::test]
async fn test_sound_cue_reaches_listener() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    let mut rx = server.state.sound.subscribe(ACCOUNT);
    let record = pending_alert(&server, 7.5, false, AlertKind::Danger).await;

    let Json(value) = alert_notification_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(request_for(&record))),
    )
    .await
    .unwrap();

    let sound = value["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["type"] == "sound")
        .cloned()
        .unwrap();
    assert_eq!(sound["status"], "sent");

    let cue = rx.try_recv().unwrap();
    assert_eq!(cue.account_id, ACCOUNT);
    assert_eq!(cue.alert_id, Some(record.id.clone()));
    assert_eq!(cue.kind, Some(AlertKind::Danger));
    assert_eq!(cue.sound_type, "default");
}

#[tokio::test]
async fn test_channel_test_sends_without_recording() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    let Json(value) = test_channel_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Path("push".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["outcome"]["type"], "push");
    assert_eq!(value["outcome"]["status"], "sent");
    assert_eq!(server.push.count().await, 1);
    assert_eq!(server.state.stores.alerts.len().unwrap(), 0);

    // No dashboard is listening, so the sound test reports a failure.
    let Json(value) = test_channel_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Path("sound".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["outcome"]["status"], "failed");

    let err = test_channel_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Path("pager".to_string()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_whatsapp_relay_errors() {
    let server = create_test_server();

    let err = whatsapp_relay_handler(
        State(server.state.clone()),
        Ok(Json(WhatsAppRelayRequest {
            to: "+15551234567".to_string(),
            message: "hello".to_string(),
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.message.contains("not configured"));

    let err = whatsapp_relay_handler(
        State(server.state.clone()),
        Ok(Json(WhatsAppRelayRequest {
            to: "  ".to_string(),
            message: "hello".to_string(),
        })),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sound_stream_requires_identity() {
    let server = create_test_server();
    let err = sound_stream_handler(State(server.state.clone()), auth("forged"))
        .await
        .err()
        .unwrap();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);

    let stream = sound_stream_handler(State(server.state.clone()), auth(TOKEN)).await;
    assert!(stream.is_ok());
    assert_eq!(server.state.sound.listener_count(ACCOUNT), 1);
    drop(stream);
    assert_eq!(server.state.sound.listener_count(ACCOUNT), 0);
}
