//! Tests for alert history handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gasmate_api::handlers::alerts::*;
use gasmate_core::{AccountSettings, Thresholds};

use crate::common::*;

fn create(gas_level: f64, alert_type: Option<&str>) -> CreateAlertRequest {
    CreateAlertRequest {
        gas_level,
        is_leak: false,
        alert_type: alert_type.map(str::to_string),
    }
}

#[tokio::test]
async fn test_create_alert_classifies_without_type() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    let Json(value) = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(7.0, None))),
    )
    .await
    .unwrap();

    let alert = &value["alert"];
    assert_eq!(alert["type"], "danger");
    assert_eq!(alert["gasLevel"], 7.0);
    assert_eq!(alert["notifications"].as_array().unwrap().len(), 0);
    assert!(alert.get("finalizedAt").map_or(true, |v| v.is_null()));
}

#[tokio::test]
async fn test_create_alert_uses_account_thresholds() {
    let server = create_test_server();
    let settings = AccountSettings {
        thresholds: Thresholds::new(1.0, 2.0),
        ..Default::default()
    };
    server.save_settings(ACCOUNT, &settings);

    let Json(value) = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(1.5, None))),
    )
    .await
    .unwrap();
    assert_eq!(value["alert"]["type"], "critical");
}

#[tokio::test]
async fn test_create_alert_rejects_normal_reading() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    let err = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(4.0, None))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.code, "VALIDATION");
    assert_eq!(server.state.stores.alerts.len().unwrap(), 0);
}

#[tokio::test]
async fn test_create_alert_with_explicit_type() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    let Json(value) = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(2.0, Some("critical")))),
    )
    .await
    .unwrap();
    assert_eq!(value["alert"]["type"], "critical");

    let err = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(9.0, Some("severe")))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_alert_requires_settings_and_identity() {
    let server = create_test_server();

    let err = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(7.0, None))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::PRECONDITION_FAILED);

    let err = create_alert_handler(
        State(server.state.clone()),
        no_auth(),
        Ok(Json(create(7.0, None))),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(server.state.stores.alerts.len().unwrap(), 0);
}

#[tokio::test]
async fn test_identical_requests_create_two_records() {
    let server = create_test_server();
    server.configure(ACCOUNT);

    for _ in 0..2 {
        create_alert_handler(
            State(server.state.clone()),
            auth(TOKEN),
            Ok(Json(create(5.0, None))),
        )
        .await
        .unwrap();
    }

    let Json(value) = list_alerts_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Query(AlertListQuery::default())),
    )
    .await
    .unwrap();
    assert_eq!(value["count"], 2);
    let alerts = value["alerts"].as_array().unwrap();
    assert_ne!(alerts[0]["id"], alerts[1]["id"]);
}

#[tokio::test]
async fn test_history_is_per_account() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    server.configure(OTHER_ACCOUNT);

    let Json(created) = create_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Json(create(5.0, None))),
    )
    .await
    .unwrap();
    let id = created["alert"]["id"].as_str().unwrap().to_string();

    let Json(value) = get_alert_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Path(id.clone()),
    )
    .await
    .unwrap();
    assert_eq!(value["alert"]["id"], id.as_str());

    let err = get_alert_handler(State(server.state.clone()), auth(OTHER_TOKEN), Path(id))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::NOT_FOUND);

    let Json(value) = list_alerts_handler(
        State(server.state.clone()),
        auth(OTHER_TOKEN),
        Ok(Query(AlertListQuery { limit: Some(10) })),
    )
    .await
    .unwrap();
    assert_eq!(value["count"], 0);
}

#[tokio::test]
async fn test_list_limit() {
    let server = create_test_server();
    server.configure(ACCOUNT);
    for value in [5.0, 5.5, 7.0] {
        create_alert_handler(
            State(server.state.clone()),
            auth(TOKEN),
            Ok(Json(create(value, None))),
        )
        .await
        .unwrap();
    }

    let Json(value) = list_alerts_handler(
        State(server.state.clone()),
        auth(TOKEN),
        Ok(Query(AlertListQuery { limit: Some(2) })),
    )
    .await
    .unwrap();
    assert_eq!(value["count"], 2);
}
