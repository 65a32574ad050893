//! Application router configuration.

use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

use super::types::{ServerState, MAX_REQUEST_BODY_SIZE};

/// Create the application router with a specific state.
pub fn create_router(state: ServerState) -> Router {
    use crate::handlers::{alerts, basic, monitor, notifications, readings, settings};

    let cors = cors_layer(&state.cors_origin);

    Router::new()
        // Health check endpoints
        .route("/api/health", get(basic::health_handler))
        .route("/api/health/status", get(basic::health_status_handler))
        // Notifications
        .route(
            "/api/notifications/alert",
            post(notifications::alert_notification_handler),
        )
        .route(
            "/api/notifications/whatsapp",
            post(notifications::whatsapp_relay_handler),
        )
        .route(
            "/api/notifications/test/:channel",
            post(notifications::test_channel_handler),
        )
        .route(
            "/api/notifications/sound/stream",
            get(notifications::sound_stream_handler),
        )
        // Alert history
        .route(
            "/api/alerts",
            get(alerts::list_alerts_handler).post(alerts::create_alert_handler),
        )
        .route("/api/alerts/:id", get(alerts::get_alert_handler))
        // Readings
        .route("/api/readings", post(readings::ingest_reading_handler))
        .route("/api/readings/latest", get(readings::latest_reading_handler))
        .route("/api/readings/history", get(readings::reading_history_handler))
        .route("/api/readings/stats", get(readings::reading_stats_handler))
        .route("/api/readings/supply", post(readings::gas_supply_handler))
        // Settings
        .route(
            "/api/settings",
            get(settings::get_settings_handler).put(settings::save_settings_handler),
        )
        // Reading monitor
        .route("/api/monitor", get(monitor::monitor_status_handler))
        .route("/api/monitor/start", post(monitor::start_monitor_handler))
        .route("/api/monitor/stop", post(monitor::stop_monitor_handler))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_SIZE))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Invalid CORS origin, cross-origin requests are disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
