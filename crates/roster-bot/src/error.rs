//! Bot error types

use roster_core::PlatformError;
use roster_service::ServiceError;
use thiserror::Error;

/// Bot error type
#[derive(Debug, Error)]
pub enum BotError {
    /// Dispatch payload could not be decoded
    #[error("Invalid payload for {event}: {message}")]
    InvalidPayload { event: String, message: String },

    /// Platform call failed
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Service error
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// The event queue is closed
    #[error("Event queue closed")]
    QueueClosed,
}

impl BotError {
    pub fn invalid_payload(event: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidPayload {
            event: event.into(),
            message: err.to_string(),
        }
    }
}

/// Bot result type
pub type BotResult<T> = Result<T, BotError>;
