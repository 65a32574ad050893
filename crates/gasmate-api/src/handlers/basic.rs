//! Health endpoints.

use axum::{extract::State, Json};
use gasmate_messages::channels::ChannelInfo;
use serde::Serialize;
use serde_json::{json, Value};

use super::ServerState;

/// Health check handler.
/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "gasmate",
        "version": gasmate_core::VERSION,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Seconds since the server started.
    pub uptime: i64,
    pub channels: Vec<ChannelInfo>,
    pub running_monitors: usize,
    pub feed_subscribers: usize,
}

/// Detailed health, including which channel transports are configured.
/// GET /api/health/status
pub async fn health_status_handler(State(state): State<ServerState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "gasmate".to_string(),
        version: gasmate_core::VERSION.to_string(),
        uptime: chrono::Utc::now().timestamp() - state.started_at,
        channels: state.pipeline.fanout_channels().info(),
        running_monitors: state.monitors.len(),
        feed_subscribers: state.feed.subscriber_count(),
    })
}
