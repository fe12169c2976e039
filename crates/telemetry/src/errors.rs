//! Error types for console API transport.
//!
//! [`ApiError`] covers every failure mode of the REST and push transports.
//! The provider layer folds these into its own taxonomy; the
//! [`is_transient`](ApiError::is_transient) classification tells callers
//! which failures are worth retrying at all.

use thiserror::Error;

/// Errors returned by the console API transports.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The referenced point does not exist on the server (HTTP 404).
    /// Terminal for this xid - retrying won't help.
    #[error("Point not found: {0}")]
    PointNotFound(String),

    /// The server rate limited the request (HTTP 429).
    #[error("Rate limited by the console API")]
    RateLimited,

    /// The request timed out before the server answered.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("API error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The server answered 2xx but the body did not parse as expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A network error occurred while talking to the server.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status behind this error, when one was observed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::PointNotFound(_) => Some(404),
            Self::RateLimited => Some(429),
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Timeout | Self::InvalidResponse(_) => None,
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::PointNotFound(_) | Self::InvalidResponse(_) => false,
        }
    }
}
