//! Object index: per-type caches of the live population and catalog.
//!
//! Each [`ObjectStore`] holds two explicit optional caches — the attribute
//! catalog and the id-keyed population — loaded on first access and dropped
//! only through the explicit invalidation operations. A successful creation
//! invalidates the owning store's population, so the created object is
//! visible to the next lookup at the cost of a full reload.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use atlas_store::ids::{AttributeId, ObjectId, ObjectTypeId, SchemaId};
use atlas_store::models::{
    AttributeWriteEntry, AttributeWriteValue, CreateObjectRequest, ObjectRef, ObjectTypeRecord,
    UpdateObjectRequest,
};
use atlas_store::{escape_filter_value, StoreClient};

use crate::batch::{FieldValue, KEY_ATTRIBUTE};
use crate::catalog::AttributeCatalog;
use crate::error::{SyncError, SyncResult};
use crate::object::StoredObject;

/// Results-per-page used for bulk population loads.
const QUERY_PAGE_SIZE: i64 = 500;

/// Static description of one object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeInfo {
    /// Id of the object type.
    pub id: ObjectTypeId,
    /// Object type name, as used in query filters.
    pub name: String,
    /// Owning schema.
    pub schema_id: SchemaId,
}

impl From<ObjectTypeRecord> for ObjectTypeInfo {
    fn from(record: ObjectTypeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            schema_id: record.object_schema_id,
        }
    }
}

/// Result of a display-name lookup: the first match plus the total match
/// count, so callers can detect silently ambiguous names.
#[derive(Debug, Clone)]
pub struct NameLookup {
    /// First matching object, if any.
    pub object: Option<StoredObject>,
    /// How many objects carried the name.
    pub matches: usize,
}

/// Per-type caches over one object type's catalog and population.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    info: ObjectTypeInfo,
    catalog: Option<AttributeCatalog>,
    population: Option<BTreeMap<ObjectId, StoredObject>>,
}

impl ObjectStore {
    /// Create an empty store for an object type.
    #[must_use]
    pub fn new(info: ObjectTypeInfo) -> Self {
        Self {
            info,
            catalog: None,
            population: None,
        }
    }

    /// The object type this store covers.
    #[must_use]
    pub fn info(&self) -> &ObjectTypeInfo {
        &self.info
    }

    /// The loaded population, if any.
    #[must_use]
    pub fn population(&self) -> Option<&BTreeMap<ObjectId, StoredObject>> {
        self.population.as_ref()
    }

    /// The loaded catalog, if any.
    #[must_use]
    pub fn catalog(&self) -> Option<&AttributeCatalog> {
        self.catalog.as_ref()
    }

    /// Drop the population cache; the next access reloads from the store.
    pub fn invalidate_population(&mut self) {
        self.population = None;
    }

    /// Drop the catalog cache; the next access reloads from the store.
    pub fn invalidate_catalog(&mut self) {
        self.catalog = None;
    }

    /// Load the attribute catalog, or return the cached one.
    async fn load_catalog(&mut self, client: &StoreClient) -> SyncResult<&AttributeCatalog> {
        match self.catalog {
            Some(ref catalog) => Ok(catalog),
            None => {
                debug!(object_type = %self.info.name, "loading attribute catalog");
                let records = client.get_attribute_catalog(self.info.id).await?;
                let catalog = AttributeCatalog::from_records(records)?;
                Ok(self.catalog.insert(catalog))
            }
        }
    }

    /// Load the full population, or return the cached one.
    ///
    /// Issues a filtered bulk query (`objectType == "<name>"`) and fetches
    /// pages strictly sequentially until all are retrieved; aggregation into
    /// the id-keyed map is order-independent.
    async fn load_population(
        &mut self,
        client: &StoreClient,
    ) -> SyncResult<&BTreeMap<ObjectId, StoredObject>> {
        if let Some(ref population) = self.population {
            return Ok(population);
        }

        let filter = format!("objectType == \"{}\"", escape_filter_value(&self.info.name));
        let mut population = BTreeMap::new();
        let mut page = 1;
        loop {
            let response = client
                .query_objects(self.info.schema_id, Some(&filter), page, QUERY_PAGE_SIZE)
                .await?;
            debug!(
                object_type = %self.info.name,
                page,
                total_pages = response.total_pages,
                entries = response.object_entries.len(),
                "fetched population page"
            );
            let total_pages = response.total_pages;
            for record in response.object_entries {
                let object = StoredObject::from_record(record);
                population.insert(object.id, object);
            }
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        info!(
            object_type = %self.info.name,
            count = population.len(),
            "loaded population"
        );
        Ok(self.population.insert(population))
    }

    /// Scan the loaded population for a display label; first match wins.
    fn scan_by_name(&self, name: &str) -> NameLookup {
        let population = match self.population {
            Some(ref population) => population,
            None => {
                return NameLookup {
                    object: None,
                    matches: 0,
                }
            }
        };

        let mut first = None;
        let mut matches = 0;
        for object in population.values() {
            if object.label == name {
                matches += 1;
                if first.is_none() {
                    first = Some(object.clone());
                }
            }
        }
        NameLookup {
            object: first,
            matches,
        }
    }
}

/// The set of object stores reachable in one schema, owning the client.
///
/// All mutation flows through the directory so cache invalidation stays
/// with the owning store; creating an object never touches any other
/// store's caches.
#[derive(Debug)]
pub struct Directory {
    client: StoreClient,
    stores: BTreeMap<ObjectTypeId, ObjectStore>,
}

impl Directory {
    /// Create an empty directory over a store client.
    #[must_use]
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            stores: BTreeMap::new(),
        }
    }

    /// The underlying client.
    #[must_use]
    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    /// Register a single object type.
    pub fn register(&mut self, info: ObjectTypeInfo) {
        self.stores.insert(info.id, ObjectStore::new(info));
    }

    /// Register every object type of a schema, returning how many were
    /// added.
    pub async fn load_schema(&mut self, schema_id: SchemaId) -> SyncResult<usize> {
        let records = self.client.list_object_types(schema_id).await?;
        let count = records.len();
        for record in records {
            self.register(record.into());
        }
        info!(%schema_id, count, "registered schema object types");
        Ok(count)
    }

    /// Get a registered store.
    pub fn store(&self, object_type_id: ObjectTypeId) -> SyncResult<&ObjectStore> {
        self.stores
            .get(&object_type_id)
            .ok_or(SyncError::ObjectTypeNotRegistered(object_type_id))
    }

    fn store_mut(&mut self, object_type_id: ObjectTypeId) -> SyncResult<&mut ObjectStore> {
        self.stores
            .get_mut(&object_type_id)
            .ok_or(SyncError::ObjectTypeNotRegistered(object_type_id))
    }

    /// The attribute catalog of an object type, loading it on first access.
    pub async fn attribute_catalog(
        &mut self,
        object_type_id: ObjectTypeId,
    ) -> SyncResult<&AttributeCatalog> {
        let client = self.client.clone();
        self.store_mut(object_type_id)?.load_catalog(&client).await
    }

    /// Id of the key attribute (`"Name"`) in an object type's catalog.
    pub async fn name_attribute_id(
        &mut self,
        object_type_id: ObjectTypeId,
    ) -> SyncResult<AttributeId> {
        let catalog = self.attribute_catalog(object_type_id).await?;
        catalog
            .find_by_name(KEY_ATTRIBUTE)
            .map(|definition| definition.id)
            .ok_or_else(|| SyncError::AttributeNotFound {
                name: KEY_ATTRIBUTE.to_string(),
                object_type: object_type_id,
            })
    }

    /// Display labels of an object type's current population.
    pub async fn existing_labels(
        &mut self,
        object_type_id: ObjectTypeId,
    ) -> SyncResult<BTreeSet<String>> {
        let client = self.client.clone();
        let population = self
            .store_mut(object_type_id)?
            .load_population(&client)
            .await?;
        Ok(population
            .values()
            .map(|object| object.label.clone())
            .collect())
    }

    /// Look up an object by display name; first match wins, the total match
    /// count is reported alongside.
    pub async fn lookup_by_name(
        &mut self,
        object_type_id: ObjectTypeId,
        name: &str,
    ) -> SyncResult<NameLookup> {
        let client = self.client.clone();
        let store = self.store_mut(object_type_id)?;
        store.load_population(&client).await?;
        Ok(store.scan_by_name(name))
    }

    /// Look up an object by display name, failing when the name is absent
    /// or ambiguous.
    pub async fn lookup_by_name_strict(
        &mut self,
        object_type_id: ObjectTypeId,
        name: &str,
    ) -> SyncResult<StoredObject> {
        let lookup = self.lookup_by_name(object_type_id, name).await?;
        match (lookup.matches, lookup.object) {
            (1, Some(object)) => Ok(object),
            (0, _) => Err(SyncError::ObjectNotFound {
                name: name.to_string(),
                object_type: object_type_id,
            }),
            (matches, _) => Err(SyncError::AmbiguousName {
                name: name.to_string(),
                matches,
                object_type: object_type_id,
            }),
        }
    }

    /// Create an object and hydrate it from the store.
    ///
    /// The owning store's population cache is invalidated so the created
    /// object is visible to subsequent lookups.
    pub async fn create_object(
        &mut self,
        object_type_id: ObjectTypeId,
        attributes: &BTreeMap<AttributeId, FieldValue>,
    ) -> SyncResult<StoredObject> {
        // Surface an unregistered type before issuing the request.
        self.store(object_type_id)?;

        let request = CreateObjectRequest {
            object_type_id,
            attributes: write_entries(attributes),
        };
        info!(object_type = %object_type_id, "creating object");
        let created = self.client.create_object(&request).await?;
        let record = self.client.get_object(created.id).await?;
        let object = StoredObject::from_record(record);

        self.store_mut(object_type_id)?.invalidate_population();
        Ok(object)
    }

    /// Submit an attribute-id-keyed payload as an object update.
    ///
    /// The population cache is left as-is; an update is an out-of-band
    /// mutation until the caller invalidates explicitly.
    pub async fn update_object(
        &mut self,
        object_type_id: ObjectTypeId,
        object_id: ObjectId,
        attributes: &BTreeMap<AttributeId, FieldValue>,
    ) -> SyncResult<ObjectRef> {
        self.store(object_type_id)?;

        let request = UpdateObjectRequest {
            object_type_id,
            attributes: write_entries(attributes),
        };
        debug!(object = %object_id, "updating object");
        Ok(self.client.update_object(object_id, &request).await?)
    }

    /// Probe whether an object exists on the store.
    pub async fn object_exists(&self, object_id: ObjectId) -> SyncResult<bool> {
        Ok(self.client.object_exists(object_id).await?)
    }

    /// Drop an object type's population cache.
    pub fn invalidate_population(&mut self, object_type_id: ObjectTypeId) -> SyncResult<()> {
        self.store_mut(object_type_id)?.invalidate_population();
        Ok(())
    }

    /// Drop an object type's catalog cache.
    pub fn invalidate_catalog(&mut self, object_type_id: ObjectTypeId) -> SyncResult<()> {
        self.store_mut(object_type_id)?.invalidate_catalog();
        Ok(())
    }
}

/// Shape an attribute-id-keyed payload into write entries; multi-valued
/// fields carry one value entry per element.
fn write_entries(attributes: &BTreeMap<AttributeId, FieldValue>) -> Vec<AttributeWriteEntry> {
    attributes
        .iter()
        .map(|(&id, value)| AttributeWriteEntry {
            object_type_attribute_id: id,
            object_attribute_values: match value {
                FieldValue::One(value) => vec![AttributeWriteValue {
                    value: value.clone(),
                }],
                FieldValue::Many(values) => values
                    .iter()
                    .map(|value| AttributeWriteValue {
                        value: value.clone(),
                    })
                    .collect(),
            },
        })
        .collect()
}
