//! Conversions from external infrastructure errors into domain errors.

use std::io::{Error as IoError, ErrorKind};

use clicktick_domain::ClickTickError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClickTickError);

impl From<InfraError> for ClickTickError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClickTickError> for InfraError {
    fn from(value: ClickTickError) -> Self {
        InfraError(value)
    }
}

trait IntoClickTickError {
    fn into_clicktick(self) -> ClickTickError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ClickTickError */
/* -------------------------------------------------------------------------- */

impl IntoClickTickError for HttpError {
    fn into_clicktick(self) -> ClickTickError {
        if self.is_timeout() {
            return ClickTickError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ClickTickError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return ClickTickError::Serialization(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ClickTickError::Auth(message),
                404 => ClickTickError::NotFound(message),
                429 => ClickTickError::RateLimited(message),
                400..=499 => ClickTickError::InvalidInput(message),
                _ => ClickTickError::Network(message),
            };
        }

        if self.is_builder() {
            return ClickTickError::Config(format!("invalid HTTP request: {self}"));
        }

        ClickTickError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_clicktick())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ClickTickError */
/* -------------------------------------------------------------------------- */

impl IntoClickTickError for IoError {
    fn into_clicktick(self) -> ClickTickError {
        match self.kind() {
            ErrorKind::NotFound => ClickTickError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                ClickTickError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData => ClickTickError::Serialization(self.to_string()),
            _ => ClickTickError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_clicktick())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ClickTickError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(ClickTickError::Serialization(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
