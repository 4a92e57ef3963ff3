//! Typed HTTP client for the atlas asset store API.
//!
//! The asset store is a hierarchical object/attribute graph reachable only
//! through its HTTP API. This crate covers that boundary: wire models,
//! authentication, and a [`StoreClient`] exposing the query, catalog, and
//! mutation operations the sync layer builds on.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod models;

pub use auth::StoreCredentials;
pub use client::{escape_filter_value, HealthCheckResult, StoreClient};
pub use config::{build_store_client, StoreTarget};
pub use error::{StoreClientError, StoreClientResult};
