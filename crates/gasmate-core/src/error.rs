//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Result type alias using the core error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the alert pipeline and its stores.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid identity credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The account has no settings document.
    #[error("User settings not found for account {0}")]
    ConfigurationMissing(String),

    /// A transport rejected a send.
    #[error("{channel} delivery failed: {message}")]
    ChannelDelivery { channel: String, message: String },

    /// Malformed input, rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The alert record already carries its notification outcomes.
    #[error("Alert {0} has already been finalized")]
    AlreadyFinalized(String),

    /// Another fanout holds the claim on this alert record.
    #[error("Notifications for alert {0} are already being sent")]
    FanoutInProgress(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
            Self::ChannelDelivery { .. } => "CHANNEL_DELIVERY",
            Self::Validation(_) => "VALIDATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyFinalized(_) => "ALREADY_FINALIZED",
            Self::FanoutInProgress(_) => "FANOUT_IN_PROGRESS",
            Self::Storage(_) => "STORAGE",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
