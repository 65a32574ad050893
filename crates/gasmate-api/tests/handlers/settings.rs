//! Tests for settings handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gasmate_api::handlers::settings::*;
use gasmate_core::{AccountSettings, Thresholds};

use crate::common::*;

#[tokio::test]
async fn test_get_defaults_when_unsaved() {
    let server = create_test_server();
    let Json(value) = get_settings_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["configured"], false);
    assert_eq!(value["settings"]["thresholds"]["critical"], 4.0);
    assert_eq!(value["settings"]["thresholds"]["danger"], 6.0);
    assert_eq!(value["settings"]["notifications"]["providers"]["firebase"], true);
}

#[tokio::test]
async fn test_save_and_read_back() {
    let server = create_test_server();
    let mut settings = AccountSettings::default();
    settings.thresholds = Thresholds::new(3.0, 8.0);
    settings.notifications.whatsapp.number = "+15551234567".to_string();

    save_settings_handler(State(server.state.clone()), auth(TOKEN), Ok(Json(settings.clone())))
        .await
        .unwrap();

    let Json(value) = get_settings_handler(State(server.state.clone()), auth(TOKEN))
        .await
        .unwrap();
    assert_eq!(value["configured"], true);
    let stored: AccountSettings = serde_json::from_value(value["settings"].clone()).unwrap();
    assert_eq!(stored, settings);

    // Settings are per account.
    let Json(value) = get_settings_handler(State(server.state.clone()), auth(OTHER_TOKEN))
        .await
        .unwrap();
    assert_eq!(value["configured"], false);
}

#[tokio::test]
async fn test_save_rejects_inverted_thresholds() {
    let server = create_test_server();
    let mut settings = AccountSettings::default();
    settings.thresholds = Thresholds::new(6.0, 4.0);

    let err = save_settings_handler(State(server.state.clone()), auth(TOKEN), Ok(Json(settings)))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(!server.state.stores.settings.exists(ACCOUNT).unwrap());
}

#[tokio::test]
async fn test_settings_require_identity() {
    let server = create_test_server();
    let err = get_settings_handler(State(server.state.clone()), no_auth())
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}
