//! Error types used throughout the application

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ClickTick
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ClickTickError {
    /// The service could not be reached or answered with a server error.
    #[error("Network error: {0}")]
    Network(String),

    /// Missing, malformed or rejected token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The service asked to slow down.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// A call exceeded its time bound.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A malformed argument or rejected request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation does not apply to the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The state store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A payload did not encode or decode.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A bug or an unexpected condition.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClickTickError {
    /// Whether the failure came from talking to the remote service.
    ///
    /// Remote failures are recovered locally by the timer and the selection
    /// controller; the next explicit user action acts as the retry.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Auth(_) | Self::RateLimited(_) | Self::Timeout(_)
        )
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::RateLimited(_) => "rate_limited",
            Self::Timeout(_) => "timeout",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidState(_) => "invalid_state",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for ClickTickError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for ClickTick operations
pub type Result<T> = std::result::Result<T, ClickTickError>;
