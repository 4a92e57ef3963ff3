//! Asset store HTTP client (reqwest-based).
//!
//! Provides a [`StoreClient`] that talks to the store's query/create/update
//! API. Every operation is a uniform request (method, path, optional body,
//! optional query parameters); non-success responses fail loudly and are
//! never retried here.

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::auth::StoreCredentials;
use crate::error::{StoreClientError, StoreClientResult};
use crate::ids::{ObjectId, ObjectTypeId, SchemaId};
use crate::models::{
    AttributeRecord, CreateObjectRequest, ObjectListResponse, ObjectRecord, ObjectRef,
    ObjectTypeRecord, SchemaListResponse, SchemaRecord, UpdateObjectRequest,
};

/// Health check result for a store target.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthCheckResult {
    /// Whether the store is reachable and responding.
    pub healthy: bool,
    /// Timestamp of the check.
    pub checked_at: chrono::DateTime<chrono::Utc>,
    /// Number of schemas visible to the caller, if healthy.
    pub schema_count: Option<usize>,
    /// Error message if unhealthy.
    pub error: Option<String>,
}

/// HTTP client for the asset store API.
///
/// `base_url` is the API root (e.g. `https://cmdb.example.com/rest/assets/1.0`);
/// a URL without a scheme defaults to `http://`.
#[derive(Debug, Clone)]
pub struct StoreClient {
    /// Normalized base URL of the store API.
    base_url: String,
    /// Credentials applied to every request.
    credentials: StoreCredentials,
    /// Underlying HTTP client.
    http_client: Client,
}

impl StoreClient {
    /// Create a new store client.
    pub fn new(
        base_url: impl Into<String>,
        credentials: StoreCredentials,
        timeout: Duration,
    ) -> StoreClientResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent("atlas-store/0.3")
            .build()
            .map_err(|e| {
                StoreClientError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_http_client(base_url, credentials, http_client))
    }

    /// Create a client with a pre-built `reqwest::Client` (for testing).
    #[must_use]
    pub fn with_http_client(
        base_url: impl Into<String>,
        credentials: StoreCredentials,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            credentials,
            http_client,
        }
    }

    /// Get the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Discovery ─────────────────────────────────────────────────────

    /// List all object schemas visible to the caller.
    pub async fn list_schemas(&self) -> StoreClientResult<Vec<SchemaRecord>> {
        let response: SchemaListResponse = self.get("/objectschema/list", &[]).await?;
        Ok(response.object_schemas)
    }

    /// List the object types of a schema.
    pub async fn list_object_types(
        &self,
        schema_id: SchemaId,
    ) -> StoreClientResult<Vec<ObjectTypeRecord>> {
        self.get(&format!("/objectschema/{schema_id}/objecttypes"), &[])
            .await
    }

    /// Fetch the attribute catalog of an object type.
    pub async fn get_attribute_catalog(
        &self,
        object_type_id: ObjectTypeId,
    ) -> StoreClientResult<Vec<AttributeRecord>> {
        self.get(&format!("/objecttype/{object_type_id}/attributes"), &[])
            .await
    }

    /// Perform a health check against the store.
    pub async fn health_check(&self) -> HealthCheckResult {
        let checked_at = chrono::Utc::now();
        match self.list_schemas().await {
            Ok(schemas) => HealthCheckResult {
                healthy: true,
                checked_at,
                schema_count: Some(schemas.len()),
                error: None,
            },
            Err(e) => HealthCheckResult {
                healthy: false,
                checked_at,
                schema_count: None,
                error: Some(e.to_string()),
            },
        }
    }

    // ── Object Operations ─────────────────────────────────────────────

    /// Query objects in a schema, one page at a time.
    ///
    /// `filter` is a store query expression (e.g. `objectType == "Server"`);
    /// pages are 1-based. The response reports the total page count so
    /// callers can iterate.
    pub async fn query_objects(
        &self,
        schema_id: SchemaId,
        filter: Option<&str>,
        page: i64,
        results_per_page: i64,
    ) -> StoreClientResult<ObjectListResponse> {
        let mut params: Vec<(&str, String)> = vec![
            ("objectSchemaId", schema_id.to_string()),
            ("page", page.to_string()),
            ("resultsPerPage", results_per_page.to_string()),
            ("includeAttributes", "true".to_string()),
        ];
        if let Some(f) = filter {
            params.push(("query", f.to_string()));
        }
        self.get("/object/query", &params).await
    }

    /// Fetch a single object by id.
    pub async fn get_object(&self, object_id: ObjectId) -> StoreClientResult<ObjectRecord> {
        self.get(&format!("/object/{object_id}"), &[]).await
    }

    /// Create an object.
    pub async fn create_object(
        &self,
        request: &CreateObjectRequest,
    ) -> StoreClientResult<ObjectRef> {
        self.post("/object/create", request).await
    }

    /// Update an object's attributes.
    pub async fn update_object(
        &self,
        object_id: ObjectId,
        request: &UpdateObjectRequest,
    ) -> StoreClientResult<ObjectRef> {
        self.put(&format!("/object/{object_id}"), request).await
    }

    /// Probe whether an object exists (HEAD).
    pub async fn object_exists(&self, object_id: ObjectId) -> StoreClientResult<bool> {
        let url = format!("{}/object/{object_id}", self.base_url);
        debug!("store HEAD {}", url);
        let builder = self.http_client.head(&url);
        let response = self.credentials.apply(builder).send().await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => self.handle_error_response(response).await,
        }
    }

    // ── Internal HTTP Methods ─────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> StoreClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("store GET {} (params={})", url, params.len());
        let mut builder = self.http_client.get(&url);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let response = self.credentials.apply(builder).send().await?;
        self.handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("store POST {}", url);
        let builder = self.http_client.post(&url);
        let response = self.credentials.apply(builder).json(body).send().await?;
        self.handle_response(response).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> StoreClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("store PUT {}", url);
        let builder = self.http_client.put(&url);
        let response = self.credentials.apply(builder).json(body).send().await?;
        self.handle_response(response).await
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> StoreClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                StoreClientError::Parse(format!("unexpected response shape: {e}"))
            })
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(
        &self,
        response: reqwest::Response,
    ) -> StoreClientResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::NOT_FOUND => Err(StoreClientError::NotFound(body)),
            StatusCode::UNAUTHORIZED => Err(StoreClientError::AuthFailed(body)),
            StatusCode::TOO_MANY_REQUESTS => Err(StoreClientError::RateLimited {
                retry_after_secs: retry_after,
            }),
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(StoreClientError::Api {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

/// Normalize a base URL: strip trailing slashes, default the scheme to
/// `http://` when none is given.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Escape a value for use inside a store query string literal.
///
/// String values in filter expressions are enclosed in double-quotes; we
/// escape backslashes and double-quotes to prevent filter injection.
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
