//! Mock asset store using wiremock for integration testing.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atlas_store::{StoreClient, StoreCredentials};
use atlas_sync::Directory;

/// A mock asset store serving catalog, query, and mutation endpoints from
/// fixture JSON.
pub struct MockStore {
    server: MockServer,
}

impl MockStore {
    /// Start a fresh mock store.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URI of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Expose the raw server for ad hoc mocks.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// A client configured to talk to this mock store.
    pub fn client(&self) -> StoreClient {
        StoreClient::with_http_client(
            self.uri(),
            StoreCredentials::Bearer {
                token: "test-token-123".to_string(),
            },
            reqwest::Client::new(),
        )
    }

    /// A directory over a fresh client for this mock store.
    pub fn directory(&self) -> Directory {
        Directory::new(self.client())
    }

    /// Mount the attribute catalog of an object type.
    pub async fn mock_catalog(&self, object_type_id: i64, attributes: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/objecttype/{object_type_id}/attributes")))
            .respond_with(ResponseTemplate::new(200).set_body_json(attributes))
            .mount(&self.server)
            .await;
    }

    /// Mount a single-page population for an object type name.
    pub async fn mock_population(&self, object_type_name: &str, entries: Value) {
        let total = entries.as_array().map_or(0, Vec::len) as i64;
        Mock::given(method("GET"))
            .and(path("/object/query"))
            .and(query_param(
                "query",
                format!("objectType == \"{object_type_name}\""),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objectEntries": entries,
                "pageNumber": 1,
                "totalPages": 1,
                "totalEntries": total,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount one page of a multi-page population.
    pub async fn mock_population_page(
        &self,
        object_type_name: &str,
        page: i64,
        total_pages: i64,
        entries: Value,
    ) {
        Mock::given(method("GET"))
            .and(path("/object/query"))
            .and(query_param(
                "query",
                format!("objectType == \"{object_type_name}\""),
            ))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "objectEntries": entries,
                "pageNumber": page,
                "totalPages": total_pages,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the creation endpoint, answering with `new_id` and asserting
    /// it is hit exactly `times` times.
    pub async fn expect_creates(&self, new_id: i64, times: u64) {
        Mock::given(method("POST"))
            .and(path("/object/create"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": new_id })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount the single-object fetch for a fixture entry.
    pub async fn mock_get_object(&self, entry: Value) {
        let id = entry["id"].as_i64().expect("fixture object needs an id");
        Mock::given(method("GET"))
            .and(path(format!("/object/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(entry))
            .mount(&self.server)
            .await;
    }

    /// Mount the per-schema object type listing.
    pub async fn mock_object_types(&self, schema_id: i64, records: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/objectschema/{schema_id}/objecttypes")))
            .respond_with(ResponseTemplate::new(200).set_body_json(records))
            .mount(&self.server)
            .await;
    }
}

// ── Fixture builders ──────────────────────────────────────────────────

/// Catalog row for a plain text attribute.
pub fn text_attribute(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "typeCode": 0, "defaultTypeId": 0 })
}

/// Catalog row for a reference attribute.
pub fn reference_attribute(id: i64, name: &str, target_type_id: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "typeCode": 1,
        "referencedObjectTypeId": target_type_id,
    })
}

/// A bare population entry.
pub fn object_entry(id: i64, object_key: &str, label: &str, object_type_id: i64) -> Value {
    json!({
        "id": id,
        "objectKey": object_key,
        "label": label,
        "objectType": { "id": object_type_id, "objectSchemaId": 1 },
        "attributes": [],
    })
}

/// A population entry carrying attribute values.
pub fn object_entry_with_attributes(
    id: i64,
    object_key: &str,
    label: &str,
    object_type_id: i64,
    attributes: Value,
) -> Value {
    json!({
        "id": id,
        "objectKey": object_key,
        "label": label,
        "objectType": { "id": object_type_id, "objectSchemaId": 1 },
        "attributes": attributes,
    })
}
