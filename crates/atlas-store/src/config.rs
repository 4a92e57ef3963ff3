//! Store target configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::StoreCredentials;
use crate::client::StoreClient;
use crate::error::{StoreClientError, StoreClientResult};

/// Connection settings for one asset store target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreTarget {
    /// API root URL of the store.
    pub base_url: String,

    /// Credentials used for every request.
    pub credentials: StoreCredentials,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether to verify the store's TLS certificate.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_tls_verify() -> bool {
    true
}

impl StoreTarget {
    /// Create a target with default connection settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: StoreCredentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            request_timeout_secs: default_request_timeout(),
            tls_verify: default_tls_verify(),
        }
    }
}

/// Build a [`StoreClient`] from a target configuration.
pub fn build_store_client(target: &StoreTarget) -> StoreClientResult<StoreClient> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(target.request_timeout_secs))
        .danger_accept_invalid_certs(!target.tls_verify)
        .user_agent("atlas-store/0.3")
        .build()
        .map_err(|e| StoreClientError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

    Ok(StoreClient::with_http_client(
        target.base_url.clone(),
        target.credentials.clone(),
        http_client,
    ))
}
