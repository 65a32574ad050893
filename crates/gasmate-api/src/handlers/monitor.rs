//! Reading monitor control.
//!
//! A monitor follows the reading feed for one account and raises an alert
//! whenever the tier escalates. It acts for the identity verified at start,
//! not for the token. Starting again replaces the running monitor.

use axum::extract::State;
use axum::http::HeaderMap;
use gasmate_messages::AlertMonitor;
use serde_json::{json, Value};

use super::common::{bearer, ok, HandlerResult};
use super::ServerState;

/// POST /api/monitor/start
pub async fn start_monitor_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> HandlerResult<Value> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let account_id = identity.account_id.clone();

    let monitor = AlertMonitor::new(state.pipeline.clone(), identity);
    let handle = monitor.spawn(state.feed.subscribe());
    let started_at = handle.started_at();

    let replaced = state
        .monitors
        .insert(account_id.clone(), handle)
        .is_some();
    tracing::info!(account_id = %account_id, replaced, "Reading monitor started");

    ok(json!({
        "accountId": account_id,
        "startedAt": started_at,
        "replaced": replaced,
    }))
}

/// POST /api/monitor/stop
pub async fn stop_monitor_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> HandlerResult<Value> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let stopped = match state.monitors.remove(&identity.account_id) {
        Some((_, handle)) => {
            handle.stop();
            true
        }
        None => false,
    };
    ok(json!({ "stopped": stopped }))
}

/// GET /api/monitor
pub async fn monitor_status_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> HandlerResult<Value> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let status = state
        .monitors
        .get(&identity.account_id)
        .map(|handle| (handle.is_running(), handle.started_at()));

    match status {
        Some((running, started_at)) => ok(json!({
            "running": running,
            "startedAt": started_at,
        })),
        None => ok(json!({ "running": false })),
    }
}
