//! Wire models for the asset store API.
//!
//! Typed request/response records for the query, catalog, and mutation
//! endpoints. Every payload exchanged with the store is one of these shapes;
//! unexpected fields are ignored on ingress, absent collections default to
//! empty.

use serde::{Deserialize, Serialize};

use crate::ids::{AttributeId, ObjectId, ObjectTypeId, SchemaId};

/// A single stored value of an object attribute.
///
/// Exactly which field carries the value depends on the attribute's type:
/// scalar types use `value`, status attributes carry an embedded `status`
/// sub-value, and reference attributes point at a `referencedObject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValueEntry {
    /// Stored scalar value, as the store renders it (always a string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Embedded status sub-value, passed through as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,

    /// Reference to another object in the graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_object: Option<ReferencedObjectRef>,
}

impl AttributeValueEntry {
    /// Entry holding a plain stored value.
    #[must_use]
    pub fn of(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Reference to another object, as embedded in an attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedObjectRef {
    /// Id of the referenced object.
    pub id: ObjectId,

    /// Display label of the referenced object, if the store included it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One attribute slot on an object record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectAttributeEntry {
    /// Id of the attribute definition this slot belongs to.
    pub object_type_attribute_id: AttributeId,

    /// Stored values, in store order.
    #[serde(default)]
    pub object_attribute_values: Vec<AttributeValueEntry>,
}

/// Owning-type reference embedded in an object record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeRef {
    /// Id of the owning object type.
    pub id: ObjectTypeId,

    /// Id of the schema the owning type belongs to.
    pub object_schema_id: SchemaId,
}

/// A full object record as returned by query and single-object fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    /// Internal identity of the object.
    pub id: ObjectId,

    /// Natural key: stable, human-facing identifier distinct from `id`.
    pub object_key: String,

    /// Display label.
    pub label: String,

    /// Owning object type.
    pub object_type: ObjectTypeRef,

    /// Attribute slots present on the object.
    #[serde(default)]
    pub attributes: Vec<ObjectAttributeEntry>,
}

/// Paged result of an object query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectListResponse {
    /// Records on this page.
    #[serde(default)]
    pub object_entries: Vec<ObjectRecord>,

    /// 1-based number of this page.
    pub page_number: i64,

    /// Total number of pages matching the query.
    pub total_pages: i64,

    /// Total number of matching records across all pages.
    #[serde(default)]
    pub total_entries: i64,
}

/// One row of an object type's attribute catalog.
///
/// `type_code` and `default_type_id` form the store's two-level type
/// encoding; resolving them into a concrete kind happens in the sync layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRecord {
    /// Id of the attribute definition.
    pub id: AttributeId,

    /// Attribute name, unique within the owning object type.
    pub name: String,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Outer type code.
    pub type_code: i64,

    /// Inner default-type id, present when `type_code` is 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type_id: Option<i64>,

    /// Referenced object type, present for reference attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_object_type_id: Option<ObjectTypeId>,
}

/// An object schema, as returned by the schema listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRecord {
    /// Id of the schema.
    pub id: SchemaId,

    /// Schema name.
    pub name: String,

    /// Short schema key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_schema_key: Option<String>,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Envelope of the schema listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaListResponse {
    /// All schemas visible to the caller.
    #[serde(default)]
    pub object_schemas: Vec<SchemaRecord>,
}

/// An object type, as returned by the per-schema type listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeRecord {
    /// Id of the object type.
    pub id: ObjectTypeId,

    /// Object type name.
    pub name: String,

    /// Id of the owning schema.
    pub object_schema_id: SchemaId,
}

/// One value in a write payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeWriteValue {
    /// The value to store, rendered as a string.
    pub value: String,
}

/// One attribute slot in a write payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeWriteEntry {
    /// Id of the attribute definition to write.
    pub object_type_attribute_id: AttributeId,

    /// Values to store; multi-valued attributes carry one entry per value.
    pub object_attribute_values: Vec<AttributeWriteValue>,
}

/// Request body for object creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectRequest {
    /// Type to create the object in.
    pub object_type_id: ObjectTypeId,

    /// Initial attribute values.
    pub attributes: Vec<AttributeWriteEntry>,
}

/// Request body for object update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectRequest {
    /// Type the updated object belongs to.
    pub object_type_id: ObjectTypeId,

    /// Attribute values to write.
    pub attributes: Vec<AttributeWriteEntry>,
}

/// Minimal acknowledgment returned by mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    /// Identity of the created or updated object.
    pub id: ObjectId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_record_deserializes_camel_case() {
        let record: ObjectRecord = serde_json::from_value(json!({
            "id": 100,
            "objectKey": "AST-100",
            "label": "Alice",
            "objectType": { "id": 10, "objectSchemaId": 1 },
            "attributes": [
                {
                    "objectTypeAttributeId": 5,
                    "objectAttributeValues": [
                        { "value": "Eng" },
                        { "referencedObject": { "id": 7, "label": "Seven" } }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(record.id, ObjectId::new(100));
        assert_eq!(record.object_key, "AST-100");
        assert_eq!(record.object_type.object_schema_id, SchemaId::new(1));
        let values = &record.attributes[0].object_attribute_values;
        assert_eq!(values[0].value.as_deref(), Some("Eng"));
        assert_eq!(
            values[1].referenced_object.as_ref().unwrap().id,
            ObjectId::new(7)
        );
    }

    #[test]
    fn test_object_record_missing_attributes_defaults_empty() {
        let record: ObjectRecord = serde_json::from_value(json!({
            "id": 1,
            "objectKey": "AST-1",
            "label": "Bare",
            "objectType": { "id": 10, "objectSchemaId": 1 }
        }))
        .unwrap();
        assert!(record.attributes.is_empty());
    }

    #[test]
    fn test_attribute_record_optional_fields() {
        let record: AttributeRecord = serde_json::from_value(json!({
            "id": 3,
            "name": "Manager",
            "typeCode": 1,
            "referencedObjectTypeId": 20
        }))
        .unwrap();
        assert_eq!(record.type_code, 1);
        assert_eq!(record.default_type_id, None);
        assert_eq!(
            record.referenced_object_type_id,
            Some(ObjectTypeId::new(20))
        );
    }

    #[test]
    fn test_create_request_serializes_camel_case() {
        let request = CreateObjectRequest {
            object_type_id: ObjectTypeId::new(20),
            attributes: vec![AttributeWriteEntry {
                object_type_attribute_id: AttributeId::new(7),
                object_attribute_values: vec![AttributeWriteValue {
                    value: "Carl".to_string(),
                }],
            }],
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "objectTypeId": 20,
                "attributes": [
                    {
                        "objectTypeAttributeId": 7,
                        "objectAttributeValues": [ { "value": "Carl" } ]
                    }
                ]
            })
        );
    }
}
