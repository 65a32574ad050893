//! Account settings handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use gasmate_core::AccountSettings;
use serde_json::{json, Value};

use super::common::{bearer, ok, HandlerResult};
use super::ServerState;

/// Get the caller's settings. Defaults are returned when none are saved.
/// GET /api/settings
pub async fn get_settings_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> HandlerResult<Value> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let stored = state.pipeline.settings_for(&identity.account_id)?;
    let configured = stored.is_some();
    ok(json!({
        "configured": configured,
        "settings": stored.unwrap_or_default(),
    }))
}

/// Save the caller's settings.
/// PUT /api/settings
pub async fn save_settings_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<AccountSettings>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(settings) = payload?;
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    settings.validate()?;

    state
        .stores
        .settings
        .put(&identity.account_id, &settings)
        .map_err(gasmate_core::Error::from)?;
    tracing::info!(
        account_id = %identity.account_id,
        channels = ?settings.notifications.enabled_channels(),
        "Settings saved"
    );
    ok(json!({ "settings": settings }))
}
