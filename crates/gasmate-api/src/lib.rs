//! HTTP API server for GasMate.
//!
//! Exposes the alert notification endpoint used by the dashboard, plus
//! readings, alert history, settings, channel tests, sound cues and the
//! per-account reading monitor. All routes live under `/api`.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod server;
pub mod shutdown;
pub mod startup;

pub use auth::HmacIdentityVerifier;
pub use config::GasmateConfig;
pub use models::{ApiResult, ErrorResponse};
pub use server::{create_router, run, ServerState};
