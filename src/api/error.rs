//! Error types for API calls
//!
//! Every failure the request framework can produce is an [`ApiError`]. Only
//! [`ApiError::Status`] and [`ApiError::Network`] are transient; everything
//! else is returned to the caller on first occurrence.

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by requests, the executor and the paginator
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid client option (base URL, auth key)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The request body could not be encoded as JSON
    #[error("can't encode body parameters: {message}")]
    Serialization { message: String },

    /// The request could not be built (malformed header name or value)
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// The server kept answering with a non-2xx status.
    ///
    /// Displays as the bare reason phrase, e.g. `Internal Server Error`.
    #[error("{reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response (connection refused, reset, ...)
    #[error("network error: {message}")]
    Network { message: String },

    /// A successful response body did not match the expected shape
    #[error("failed to decode response body: {message}")]
    Decode { message: String },

    /// `next_page` was called after the last page had been returned
    #[error("no more pages")]
    NoMorePages,

    /// Paginator constructed with a zero page size
    #[error("paginator limit should not be 0")]
    InvalidLimit,

    /// Filter condition outside gt/gte/lt/lte/range/in (strict mode only)
    #[error("unsupported filter condition: {condition:?}")]
    InvalidFilter { condition: String },

    /// The caller's cancellation token fired before the call completed
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Build a status error carrying the canonical reason phrase
    pub fn from_status(status: u16) -> Self {
        Self::Status {
            status,
            reason: reason_phrase(status),
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Network { .. })
    }

    /// HTTP status of the last response, if the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Textual reason phrase for an HTTP status code
///
/// Codes without a registered phrase fall back to `HTTP <code>`.
pub fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
