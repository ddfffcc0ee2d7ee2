// --- File: crates/calbridge_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error type shared by all calbridge crates.
///
/// Remote failures keep the classification the calendar service gave them so callers
/// can tell retryable conditions from terminal ones. Nothing here is recovered locally.
#[derive(Error, Debug)]
pub enum CalbridgeError {
    /// A calendar or event identifier does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// The credentials lack the scope or permission for the call
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The remote service rejected the input (e.g. end before start)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote service asked us to slow down
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Overload, server error or broken connection
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Credential acquisition or refresh failed
    #[error("Authentication error: {0}")]
    AuthFailure(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other remote status
    #[error("Remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The remote payload could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalbridgeError {
    /// Whether repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CalbridgeError::RateLimited(_) | CalbridgeError::Transient(_)
        )
    }

    /// Classifies a remote HTTP status.
    ///
    /// `reason` is the service's machine-readable reason, if any. Google reports quota
    /// exhaustion as 403 with a rate-limit reason, so those map to `RateLimited`.
    pub fn from_status(status: u16, reason: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 409 | 412 => CalbridgeError::InvalidArgument(message),
            401 => CalbridgeError::AuthFailure(message),
            403 if reason.is_some_and(is_rate_limit_reason) => CalbridgeError::RateLimited(message),
            403 => CalbridgeError::Forbidden(message),
            404 | 410 => CalbridgeError::NotFound(message),
            429 => CalbridgeError::RateLimited(message),
            500..=599 => CalbridgeError::Transient(message),
            _ => CalbridgeError::Remote { status, message },
        }
    }
}

fn is_rate_limit_reason(reason: &str) -> bool {
    matches!(
        reason,
        "rateLimitExceeded" | "userRateLimitExceeded" | "quotaExceeded"
    )
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CalbridgeError {
    fn status_code(&self) -> u16 {
        match self {
            CalbridgeError::NotFound(_) => 404,
            CalbridgeError::Forbidden(_) => 403,
            CalbridgeError::InvalidArgument(_) => 400,
            CalbridgeError::RateLimited(_) => 429,
            CalbridgeError::Transient(_) => 503,
            CalbridgeError::AuthFailure(_) => 401,
            CalbridgeError::Config(_) => 500,
            CalbridgeError::Remote { status, .. } => *status,
            CalbridgeError::Decode(_) => 502,
            CalbridgeError::Internal(_) => 500,
        }
    }
}

impl From<config::ConfigError> for CalbridgeError {
    fn from(err: config::ConfigError) -> Self {
        CalbridgeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CalbridgeError {
    fn from(err: serde_json::Error) -> Self {
        CalbridgeError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for CalbridgeError {
    fn from(err: std::io::Error) -> Self {
        CalbridgeError::Internal(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> CalbridgeError {
    CalbridgeError::Config(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> CalbridgeError {
    CalbridgeError::AuthFailure(message.to_string())
}
