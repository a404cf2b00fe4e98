// Error taxonomy for the integration flow.
//
// Client-correctable failures (denied consent, bad state tokens, consumed
// credentials) surface as 400-class errors; storage outages as 500-class.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// Stable error codes surfaced to callers of the OAuth and fetch flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The provider rejected the consent request.
    AuthorizationDenied,
    /// The state token could not be decoded.
    InvalidState,
    /// The CSRF check failed, or the pending state expired or was consumed.
    StateMismatch,
    /// The token endpoint returned a non-success response.
    TokenExchangeFailed,
    /// Credentials are missing, expired, or already consumed.
    NoCredentials,
    /// The key-value store is unreachable. Not user-correctable.
    StorageUnavailable,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::AuthorizationDenied => "Authorization denied by provider",
            Self::InvalidState => "Invalid state token",
            Self::StateMismatch => "State mismatch",
            Self::TokenExchangeFailed => "Token exchange failed",
            Self::NoCredentials => "No credentials found",
            Self::StorageUnavailable => "Storage unavailable",
        };
        write!(f, "{msg}")
    }
}

/// HTTP status classes used by the error surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatus {
    BadRequest = 400,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// Client-facing error carrying an HTTP status class, a stable code, and a
/// human-readable detail message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status} {code:?}: {message}")]
pub struct ApiError {
    pub status: HttpStatus,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: HttpStatus, code: ErrorCode) -> Self {
        Self {
            message: code.to_string(),
            status,
            code,
        }
    }

    pub fn with_message(status: HttpStatus, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: ErrorCode) -> Self {
        Self::new(HttpStatus::BadRequest, code)
    }

    /// Infrastructure failure: not user-correctable, surfaced as a 5xx.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(
            HttpStatus::InternalServerError,
            ErrorCode::StorageUnavailable,
            message,
        )
    }

    /// JSON body for the error response.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
        })
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::internal(err.to_string())
    }
}
