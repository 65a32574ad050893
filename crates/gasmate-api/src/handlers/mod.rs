//! API handlers organized by domain.

pub mod alerts;
pub mod basic;
pub mod common;
pub mod monitor;
pub mod notifications;
pub mod readings;
pub mod settings;

// Re-export ServerState so handlers can use it
pub use crate::server::ServerState;

pub use basic::health_handler;
pub use notifications::alert_notification_handler;
