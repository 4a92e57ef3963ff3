//! Integration tests for the store HTTP client — auth, query parameters,
//! and error mapping.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atlas_store::ids::{AttributeId, ObjectId, ObjectTypeId, SchemaId};
use atlas_store::models::{
    AttributeWriteEntry, AttributeWriteValue, CreateObjectRequest, UpdateObjectRequest,
};
use atlas_store::{StoreClient, StoreClientError, StoreCredentials};

/// Helper: create a client pointing at a wiremock server with Basic auth.
fn basic_client(server: &MockServer) -> StoreClient {
    StoreClient::with_http_client(
        server.uri(),
        StoreCredentials::Basic {
            username: "svc-sync".to_string(),
            password: "hunter2".to_string(),
        },
        reqwest::Client::new(),
    )
}

/// Helper: create a client pointing at a wiremock server with Bearer auth.
fn bearer_client(server: &MockServer) -> StoreClient {
    StoreClient::with_http_client(
        server.uri(),
        StoreCredentials::Bearer {
            token: "test-token-123".to_string(),
        },
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn test_list_schemas_sends_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .and(basic_auth("svc-sync", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectSchemas": [
                { "id": 1, "name": "Assets", "objectSchemaKey": "AST" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let schemas = basic_client(&server).list_schemas().await.unwrap();
    assert_eq!(schemas.len(), 1);
    assert_eq!(schemas[0].id, SchemaId::new(1));
    assert_eq!(schemas[0].object_schema_key.as_deref(), Some("AST"));
}

#[tokio::test]
async fn test_bearer_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .and(header("Authorization", "Bearer test-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "objectSchemas": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let schemas = bearer_client(&server).list_schemas().await.unwrap();
    assert!(schemas.is_empty());
}

#[tokio::test]
async fn test_query_objects_sends_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/query"))
        .and(query_param("objectSchemaId", "1"))
        .and(query_param("page", "2"))
        .and(query_param("resultsPerPage", "500"))
        .and(query_param("includeAttributes", "true"))
        .and(query_param("query", "objectType == \"Server\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectEntries": [],
            "pageNumber": 2,
            "totalPages": 2,
            "totalEntries": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = basic_client(&server)
        .query_objects(SchemaId::new(1), Some("objectType == \"Server\""), 2, 500)
        .await
        .unwrap();
    assert_eq!(response.page_number, 2);
    assert_eq!(response.total_pages, 2);
}

#[tokio::test]
async fn test_get_attribute_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objecttype/10/attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Name", "typeCode": 0, "defaultTypeId": 0 },
            { "id": 5, "name": "Manager", "typeCode": 1, "referencedObjectTypeId": 20 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = basic_client(&server)
        .get_attribute_catalog(ObjectTypeId::new(10))
        .await
        .unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[1].referenced_object_type_id, Some(ObjectTypeId::new(20)));
}

#[tokio::test]
async fn test_create_object_posts_typed_body() {
    let server = MockServer::start().await;

    let request = CreateObjectRequest {
        object_type_id: ObjectTypeId::new(20),
        attributes: vec![AttributeWriteEntry {
            object_type_attribute_id: AttributeId::new(7),
            object_attribute_values: vec![AttributeWriteValue {
                value: "Carl".to_string(),
            }],
        }],
    };

    Mock::given(method("POST"))
        .and(path("/object/create"))
        .and(body_json(json!({
            "objectTypeId": 20,
            "attributes": [
                {
                    "objectTypeAttributeId": 7,
                    "objectAttributeValues": [ { "value": "Carl" } ]
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 200 })))
        .expect(1)
        .mount(&server)
        .await;

    let created = basic_client(&server).create_object(&request).await.unwrap();
    assert_eq!(created.id, ObjectId::new(200));
}

#[tokio::test]
async fn test_update_object_puts_to_object_path() {
    let server = MockServer::start().await;

    let request = UpdateObjectRequest {
        object_type_id: ObjectTypeId::new(10),
        attributes: vec![],
    };

    Mock::given(method("PUT"))
        .and(path("/object/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 100 })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = basic_client(&server)
        .update_object(ObjectId::new(100), &request)
        .await
        .unwrap();
    assert_eq!(updated.id, ObjectId::new(100));
}

#[tokio::test]
async fn test_object_exists_head_probe() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/object/100"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/object/404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = basic_client(&server);
    assert!(client.object_exists(ObjectId::new(100)).await.unwrap());
    assert!(!client.object_exists(ObjectId::new(404)).await.unwrap());
}

#[tokio::test]
async fn test_not_found_maps_to_not_found_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/object/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such object"))
        .mount(&server)
        .await;

    let err = basic_client(&server)
        .get_object(ObjectId::new(999))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreClientError::NotFound(_)));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let err = basic_client(&server).list_schemas().await.unwrap_err();
    assert!(matches!(err, StoreClientError::AuthFailed(_)));
}

#[tokio::test]
async fn test_rate_limited_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "17"),
        )
        .mount(&server)
        .await;

    let err = basic_client(&server).list_schemas().await.unwrap_err();
    assert!(err.is_transient());
    match err {
        StoreClientError::RateLimited { retry_after_secs } => {
            assert_eq!(retry_after_secs, Some(17));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = basic_client(&server).list_schemas().await.unwrap_err();
    match err {
        StoreClientError::Api { status, ref detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "boom");
        }
        ref other => panic!("expected Api, got {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = basic_client(&server).list_schemas().await.unwrap_err();
    assert!(matches!(err, StoreClientError::Parse(_)));
}

#[tokio::test]
async fn test_health_check_reports_unreachable() {
    // Point at a port nobody is listening on.
    let client = StoreClient::new(
        "http://127.0.0.1:9",
        StoreCredentials::Bearer {
            token: "t".to_string(),
        },
        Duration::from_millis(200),
    )
    .unwrap();

    let health = client.health_check().await;
    assert!(!health.healthy);
    assert!(health.error.is_some());
    assert!(health.schema_count.is_none());
}

#[tokio::test]
async fn test_health_check_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/objectschema/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectSchemas": [ { "id": 1, "name": "Assets" } ]
        })))
        .mount(&server)
        .await;

    let health = basic_client(&server).health_check().await;
    assert!(health.healthy);
    assert_eq!(health.schema_count, Some(1));
}
