//! Store authentication — Basic credentials and Bearer tokens.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

/// Credentials for an asset store target.
///
/// The [`Debug`] impl redacts sensitive fields (passwords and tokens) to
/// prevent accidental credential exposure in log output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreCredentials {
    /// HTTP Basic authentication.
    Basic { username: String, password: String },

    /// Bearer token authentication.
    Bearer { token: String },
}

impl StoreCredentials {
    /// Apply these credentials to an outgoing request.
    #[must_use]
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            StoreCredentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
            StoreCredentials::Bearer { token } => builder.bearer_auth(token),
        }
    }
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
        }
    }
}
