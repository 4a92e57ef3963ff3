//! Transport error taxonomy for the store client.
//!
//! Every non-success response from the store fails loudly and propagates
//! unmodified; the client performs no retries.

use thiserror::Error;

/// Error returned by store client operations.
#[derive(Debug, Error)]
pub enum StoreClientError {
    /// Client construction or configuration is invalid.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The requested resource does not exist on the store (HTTP 404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Authentication was rejected (HTTP 401).
    #[error("authentication failed (401): {0}")]
    AuthFailed(String),

    /// The store throttled the request (HTTP 429).
    #[error("rate limited by the store (retry after {retry_after_secs:?} seconds)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success response from the store.
    #[error("store API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response could not be parsed into the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A request body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreClientError {
    /// Get an error code for classification.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreClientError::InvalidConfig(_) => "INVALID_CONFIG",
            StoreClientError::NotFound(_) => "NOT_FOUND",
            StoreClientError::AuthFailed(_) => "AUTH_FAILED",
            StoreClientError::RateLimited { .. } => "RATE_LIMITED",
            StoreClientError::Api { .. } => "API_ERROR",
            StoreClientError::Network(_) => "NETWORK_ERROR",
            StoreClientError::Parse(_) => "PARSE_ERROR",
            StoreClientError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is transient and a caller-level retry could help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            StoreClientError::Network(_) | StoreClientError::RateLimited { .. } => true,
            StoreClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for store client operations.
pub type StoreClientResult<T> = Result<T, StoreClientError>;
