//! Alert history handlers.
//!
//! GET  /api/alerts      - List the caller's alerts, newest first
//! POST /api/alerts      - Record a pending alert
//! GET  /api/alerts/:id  - Get one alert

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use gasmate_core::{AlertId, AlertKind, Reading, Thresholds};
use serde::Deserialize;
use serde_json::{json, Value};

use super::common::{bearer, ok, HandlerResult};
use super::ServerState;
use crate::models::ErrorResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub gas_level: f64,
    #[serde(deserialize_with = "gasmate_core::reading::leak_flag::deserialize")]
    pub is_leak: bool,
    /// `critical` or `danger`. Classified from the account thresholds when absent.
    #[serde(default)]
    pub alert_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertListQuery {
    pub limit: Option<usize>,
}

/// Record an alert without dispatching it.
/// POST /api/alerts
pub async fn create_alert_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(req) = payload?;
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let account_id = identity.account_id.as_str();

    let settings = state
        .pipeline
        .settings_for(account_id)?
        .ok_or_else(|| gasmate_core::Error::ConfigurationMissing(account_id.to_string()))?;

    let reading = Reading::new(req.gas_level, req.is_leak);
    let kind = match req.alert_type.as_deref() {
        Some(alert_type) => AlertKind::from_string(alert_type).ok_or_else(|| {
            ErrorResponse::bad_request(format!("Unknown alertType '{}'", alert_type))
        })?,
        None => kind_for(&settings.thresholds, &reading)?,
    };

    let record = state
        .pipeline
        .recorder()
        .record_alert(account_id, &reading, kind)
        .await?;
    ok(json!({ "alert": record }))
}

fn kind_for(thresholds: &Thresholds, reading: &Reading) -> gasmate_core::Result<AlertKind> {
    AlertKind::try_from(thresholds.classify(reading.check_value)).map_err(|_| {
        gasmate_core::Error::Validation(format!(
            "Gas level {} is within the normal range",
            reading.check_value
        ))
    })
}

/// List alerts.
/// GET /api/alerts?limit=
pub async fn list_alerts_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    query: Result<Query<AlertListQuery>, QueryRejection>,
) -> HandlerResult<Value> {
    let Query(query) = query?;
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let alerts = state
        .pipeline
        .recorder()
        .list_alerts(&identity.account_id, query.limit)
        .await?;
    ok(json!({
        "count": alerts.len(),
        "alerts": alerts,
    }))
}

/// Get one alert.
/// GET /api/alerts/:id
pub async fn get_alert_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> HandlerResult<Value> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let alert_id = AlertId::from_string(&id)
        .map_err(|_| ErrorResponse::not_found(format!("Alert {} not found", id)))?;
    let alert = state
        .pipeline
        .recorder()
        .get_alert(&identity.account_id, &alert_id)
        .await?;
    ok(json!({ "alert": alert }))
}
