//! Notification API handlers.
//!
//! POST /api/notifications/alert          - Fan an alert out to every enabled channel
//! POST /api/notifications/whatsapp       - Standalone WhatsApp relay (no auth)
//! POST /api/notifications/test/:channel  - Send a test notice through one channel
//! GET  /api/notifications/sound/stream   - Server-sent sound cues for the caller

use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use chrono::{DateTime, Utc};
use futures::Stream;
use gasmate_core::{AlertId, AlertKind, AlertNotice, ChannelKind};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;

use super::common::{bearer, ok, HandlerResult};
use super::ServerState;
use crate::models::ErrorResponse;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNotificationRequest {
    pub alert_id: String,
    pub gas_level: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "gasmate_core::reading::leak_flag::deserialize")]
    pub is_leak: bool,
    pub alert_type: String,
}

impl AlertNotificationRequest {
    fn notice(&self) -> Result<AlertNotice, ErrorResponse> {
        let kind = AlertKind::from_string(&self.alert_type).ok_or_else(|| {
            ErrorResponse::bad_request(format!("Unknown alertType '{}'", self.alert_type))
        })?;
        // An id that is not a UUID cannot name a stored record.
        let alert_id = AlertId::from_string(&self.alert_id)
            .map_err(|_| ErrorResponse::not_found(format!("Alert {} not found", self.alert_id)))?;
        Ok(AlertNotice {
            alert_id,
            kind,
            gas_level: self.gas_level,
            is_leak: self.is_leak,
            timestamp: self.timestamp,
        })
    }
}

/// Fan an alert out and record the outcomes.
/// POST /api/notifications/alert
///
/// Succeeds once every enabled channel has been attempted, whatever the
/// individual outcomes.
pub async fn alert_notification_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<AlertNotificationRequest>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(req) = payload?;
    let notice = req.notice()?;

    let outcomes = state
        .pipeline
        .fanout(bearer(&headers), &notice)
        .await
        .map_err(ErrorResponse::for_notification)?;

    let sent = outcomes.iter().filter(|o| o.is_sent()).count();
    tracing::info!(
        alert_id = %notice.alert_id,
        kind = %notice.kind,
        attempted = outcomes.len(),
        sent,
        "Alert notifications dispatched"
    );

    ok(json!({ "notifications": outcomes }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppRelayRequest {
    pub to: String,
    pub message: String,
}

/// Send one WhatsApp message.
/// POST /api/notifications/whatsapp
pub async fn whatsapp_relay_handler(
    State(state): State<ServerState>,
    payload: Result<Json<WhatsAppRelayRequest>, JsonRejection>,
) -> HandlerResult<Value> {
    let Json(req) = payload?;
    let message_id = state
        .pipeline
        .send_whatsapp_text(&req.to, &req.message)
        .await
        .map_err(ErrorResponse::for_notification)?;
    ok(json!({ "messageId": message_id }))
}

/// Send a test notice through one channel.
/// POST /api/notifications/test/:channel
pub async fn test_channel_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(channel): Path<String>,
) -> HandlerResult<Value> {
    let kind = ChannelKind::from_string(&channel)
        .ok_or_else(|| ErrorResponse::bad_request(format!("Unknown channel '{}'", channel)))?;

    let outcome = state
        .pipeline
        .test_channel(bearer(&headers), kind)
        .await
        .map_err(ErrorResponse::for_notification)?;

    ok(json!({
        "success": outcome.is_sent(),
        "outcome": outcome,
    }))
}

/// Stream the caller's sound cues as server-sent events.
/// GET /api/notifications/sound/stream
pub async fn sound_stream_handler(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ErrorResponse> {
    let identity = state.pipeline.authorize(bearer(&headers)).await?;
    let mut rx = state.sound.subscribe(&identity.account_id);
    tracing::debug!(account_id = %identity.account_id, "Sound cue stream opened");

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(cue) => {
                    let event = Event::default()
                        .event("sound")
                        .json_data(&cue)
                        .unwrap_or_else(|_| Event::default().data(""));
                    yield Ok::<Event, axum::Error>(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Sound cue stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    ))
}
