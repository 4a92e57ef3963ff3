//! Stored objects: the live population side of a reconciliation run.

use std::collections::BTreeMap;

use atlas_store::ids::{AttributeId, ObjectId, ObjectTypeId, SchemaId};
use atlas_store::models::{AttributeValueEntry, ObjectRecord};
use atlas_store::StoreClient;

use crate::catalog::AttributeCatalog;
use crate::codec::{self, Value};
use crate::error::{SyncError, SyncResult};

/// One object of the target store's population.
///
/// Attribute values are kept raw, keyed by attribute id; decoding happens on
/// access through [`StoredObject::attribute_value`], so hydrating an object
/// never needs its catalog and reference chains terminate.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Internal identity.
    pub id: ObjectId,

    /// Natural key: stable, human-facing identifier distinct from `id`.
    pub object_key: String,

    /// Display label.
    pub label: String,

    /// Owning object type.
    pub object_type_id: ObjectTypeId,

    /// Schema the owning type belongs to.
    pub schema_id: SchemaId,

    attributes: BTreeMap<AttributeId, Vec<AttributeValueEntry>>,
}

impl StoredObject {
    /// Build an object from its wire record.
    #[must_use]
    pub fn from_record(record: ObjectRecord) -> Self {
        let attributes = record
            .attributes
            .into_iter()
            .map(|entry| (entry.object_type_attribute_id, entry.object_attribute_values))
            .collect();
        Self {
            id: record.id,
            object_key: record.object_key,
            label: record.label,
            object_type_id: record.object_type.id,
            schema_id: record.object_type.object_schema_id,
            attributes,
        }
    }

    /// Raw stored values of an attribute, if the object carries it.
    #[must_use]
    pub fn raw_values(&self, id: AttributeId) -> Option<&[AttributeValueEntry]> {
        self.attributes.get(&id).map(Vec::as_slice)
    }

    /// Ids of the attributes present on this object.
    pub fn attribute_ids(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.attributes.keys().copied()
    }

    /// Decode the named attribute through its catalog definition.
    ///
    /// An attribute the object does not carry decodes to [`Value::None`];
    /// a name absent from the catalog is a NotFound error. Reference-kind
    /// attributes fetch their referenced objects through `client`.
    pub async fn attribute_value(
        &self,
        name: &str,
        catalog: &AttributeCatalog,
        client: &StoreClient,
    ) -> SyncResult<Value> {
        let definition =
            catalog
                .find_by_name(name)
                .ok_or_else(|| SyncError::AttributeNotFound {
                    name: name.to_string(),
                    object_type: self.object_type_id,
                })?;

        match self.attributes.get(&definition.id) {
            None => Ok(Value::None),
            Some(raw) => codec::decode(client, definition, raw).await,
        }
    }
}
