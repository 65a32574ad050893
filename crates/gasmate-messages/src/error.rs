//! Error types for notification delivery.

use gasmate_core::ChannelKind;
use thiserror::Error;

pub use gasmate_core::Error as CoreError;

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by a single delivery attempt.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport rejected the send; carries the transport's own message.
    #[error("{0}")]
    Transport(String),

    /// Send operation failed before reaching the transport.
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The account has no usable address for this channel.
    #[error("{0}")]
    MissingRecipient(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl Error {
    /// Convert into the core taxonomy, attributing the failure to `channel`.
    pub fn into_delivery(self, channel: ChannelKind) -> CoreError {
        match self {
            Error::Core(e) => e,
            other => CoreError::ChannelDelivery {
                channel: channel.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::SendFailed(format!("HTTP request failed: {}", e))
    }
}
