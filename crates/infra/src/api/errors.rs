//! Errors raised by the ClickUp REST layer

use std::time::Duration;

use clicktick_domain::ClickTickError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a ClickUp call, before mapping to the domain error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 or 403, or no usable token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 429.
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// 5xx.
    #[error("Server error: {0}")]
    Server(String),

    /// Any other 4xx.
    #[error("Client error: {0}")]
    Client(String),

    /// 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request did not complete.
    #[error("Network error: {0}")]
    Network(String),

    /// The client could not be built.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The body did not decode.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The call exceeded its bound.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// Error payload ClickUp attaches to failed calls.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    err: String,
    #[serde(rename = "ECODE", default)]
    ecode: Option<String>,
}

/// `err (ECODE)` when the body is ClickUp's JSON error shape, else the raw
/// body trimmed.
fn describe_body(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { err, ecode: Some(code) }) => Some(format!("{err} ({code})")),
        Ok(ErrorBody { err, ecode: None }) => Some(err),
        Err(_) => Some(body.to_string()),
    }
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let message = match describe_body(body) {
            Some(detail) => format!("{url} returned status {status}: {detail}"),
            None => format!("{url} returned status {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(message),
            s if s.is_server_error() => Self::Server(message),
            s if s.is_client_error() => Self::Client(message),
            _ => Self::Network(message),
        }
    }
}

impl From<ClickTickError> for ApiError {
    fn from(err: ClickTickError) -> Self {
        match err {
            ClickTickError::Network(message) => Self::Network(message),
            ClickTickError::Auth(message) => Self::Auth(message),
            ClickTickError::RateLimited(message) => Self::RateLimit(message),
            ClickTickError::Timeout(limit) => Self::Timeout(limit),
            ClickTickError::NotFound(message) => Self::NotFound(message),
            ClickTickError::InvalidInput(message) => Self::Client(message),
            ClickTickError::Config(message) => Self::Config(message),
            ClickTickError::Serialization(message) => Self::Decode(message),
            ClickTickError::InvalidState(message)
            | ClickTickError::Storage(message)
            | ClickTickError::Internal(message) => Self::Server(message),
        }
    }
}

impl From<ApiError> for ClickTickError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::RateLimit(message) => Self::RateLimited(message),
            ApiError::Server(message) | ApiError::Network(message) => Self::Network(message),
            ApiError::Client(message) => Self::InvalidInput(message),
            ApiError::NotFound(message) => Self::NotFound(message),
            ApiError::Config(message) => Self::Config(message),
            ApiError::Decode(message) => Self::Serialization(message),
            ApiError::Timeout(limit) => Self::Timeout(limit),
        }
    }
}
