//! Reading API handlers.
//!
//! POST /api/readings          - Ingest and broadcast a reading
//! GET  /api/readings/latest   - Latest reading
//! GET  /api/readings/history  - Recent readings, newest first
//! GET  /api/readings/stats    - Statistics over a time range
//! POST /api/readings/supply   - Open or close the gas supply

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use gasmate_core::config::{clamp_limit, defaults};
use gasmate_core::{daily_averages, GasSupply, Reading, ReadingStats, Thresholds, TimeRange};
use serde::Deserialize;
use serde_json::{json, Value};

use super::common::{bearer, ok, HandlerResult};
use super::ServerState;
use crate::models::ErrorResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReadingRequest {
    pub check_value: f64,
    #[serde(deserialize_with = "gasmate_core::reading::leak_flag::deserialize")]
    pub is_leak: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GasSupplyRequest {
    pub value: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub range: Option<String>,
}

/// Store a reading in history and publish it to every subscriber.
fn ingest(state: &ServerState, reading: Reading) -> Result<usize, ErrorResponse> {
    state
        .stores
        .readings
        .append(&reading)
        .map_err(gasmate_core::Error::from)?;
    Ok(state.feed.publish(reading))
}

/// Ingest a reading.
/// POST /api/readings
pub async fn ingest_reading_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<IngestReadingRequest>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(req) = payload?;
    state.pipeline.authorize(bearer(&headers)).await?;

    let reading = Reading::new(req.check_value, req.is_leak);
    let subscribers = ingest(&state, reading)?;
    tracing::debug!(check_value = reading.check_value, is_leak = reading.is_leak, subscribers, "Reading ingested");

    ok(json!({
        "reading": reading,
        "subscribers": subscribers,
    }))
}

/// Latest reading.
/// GET /api/readings/latest
pub async fn latest_reading_handler(State(state): State<ServerState>) -> HandlerResult<Value> {
    let reading = match state.feed.latest() {
        Some(reading) => Some(reading),
        None => state
            .stores
            .readings
            .latest()
            .map_err(gasmate_core::Error::from)?,
    };
    ok(json!({ "reading": reading }))
}

/// Reading history.
/// GET /api/readings/history?limit=
pub async fn reading_history_handler(
    State(state): State<ServerState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> HandlerResult<Value> {
    let Query(query) = query?;
    let limit = clamp_limit(query.limit, defaults::READING_HISTORY_LIMIT);
    let readings = state
        .stores
        .readings
        .recent(limit)
        .map_err(gasmate_core::Error::from)?;
    ok(json!({
        "count": readings.len(),
        "readings": readings,
    }))
}

/// Statistics against the caller's thresholds.
/// GET /api/readings/stats?range=1h|24h|7d|30d
pub async fn reading_stats_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> HandlerResult<Value> {
    let Query(query) = query?;
    let range = match query.range.as_deref() {
        Some(range) => TimeRange::from_string(range).ok_or_else(|| {
            ErrorResponse::bad_request(format!(
                "Unknown range '{}': expected 1h, 24h, 7d or 30d",
                range
            ))
        })?,
        None => TimeRange::default(),
    };

    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let thresholds = state
        .pipeline
        .settings_for(&identity.account_id)?
        .map(|s| s.thresholds)
        .unwrap_or_else(Thresholds::default);

    let now = Utc::now();
    let readings = state
        .stores
        .readings
        .since(range.start(now))
        .map_err(gasmate_core::Error::from)?;
    let stats = ReadingStats::for_range(&readings, &thresholds, range, now);

    ok(json!({
        "range": range,
        "thresholds": thresholds,
        "stats": stats,
        "daily": daily_averages(&readings),
    }))
}

/// Open (`1`) or close (`0`) the gas supply.
/// POST /api/readings/supply
///
/// Closing republishes the latest reading with the leak flag set. Opening
/// republishes it with the flag cleared.
pub async fn gas_supply_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<GasSupplyRequest>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(req) = payload?;
    let supply = GasSupply::from_value(req.value)?;
    let identity = state.pipeline.authorize(bearer(&headers)).await?;

    let reading = match supply {
        GasSupply::Closed => state.feed.close_supply(),
        GasSupply::Open => state.feed.open_supply(),
    };
    state
        .stores
        .readings
        .append(&reading)
        .map_err(gasmate_core::Error::from)?;
    tracing::info!(account_id = %identity.account_id, supply = ?supply, "Gas supply changed");

    ok(json!({
        "supply": supply.as_value(),
        "reading": reading,
    }))
}
