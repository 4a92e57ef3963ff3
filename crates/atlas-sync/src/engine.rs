//! Reconciliation engine: classifies a record batch against the live
//! population and assembles attribute-id-keyed payloads, resolving
//! reference attributes through the object graph.
//!
//! Classification is a three-way set diff. With S the batch key values and
//! E the existing display labels of the target type:
//!
//! ```text
//! to_update  = S ∩ E
//! to_create  = S − E
//! to_disable = E − S      (computed, exposed read-only, never applied)
//! ```
//!
//! Reference attributes resolve by display name in the referenced type's
//! population. A missing referenced object is created on demand with only
//! its name attribute set; the created identity is NOT written into the
//! current payload — the attribute (or list element) is omitted for this
//! run and resolves on the next one.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use atlas_store::ids::{AttributeId, ObjectId, ObjectTypeId};

use crate::batch::{FieldValue, Record, RecordBatch};
use crate::error::{SyncError, SyncResult};
use crate::index::{Directory, NameLookup};
use crate::object::StoredObject;

/// Three-way classification of batch keys against the live population.
///
/// Each list is sorted lexicographically so runs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Keys present in both the batch and the population.
    pub to_update: Vec<String>,
    /// Keys present only in the batch.
    pub to_create: Vec<String>,
    /// Labels present only in the population.
    pub to_disable: Vec<String>,
}

/// Classify batch keys against existing display labels.
pub fn classify<'a, S, E>(source_keys: S, existing_labels: E) -> Classification
where
    S: IntoIterator<Item = &'a str>,
    E: IntoIterator<Item = &'a str>,
{
    let source: BTreeSet<&str> = source_keys.into_iter().collect();
    let existing: BTreeSet<&str> = existing_labels.into_iter().collect();

    Classification {
        to_update: source
            .intersection(&existing)
            .map(|name| (*name).to_string())
            .collect(),
        to_create: source
            .difference(&existing)
            .map(|name| (*name).to_string())
            .collect(),
        to_disable: existing
            .difference(&source)
            .map(|name| (*name).to_string())
            .collect(),
    }
}

/// A non-fatal condition surfaced during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncWarning {
    /// A display name matched more than one object; the first match was
    /// used.
    AmbiguousName {
        object_type: ObjectTypeId,
        name: String,
        matches: usize,
    },
}

/// Attribute-id-keyed payload for one object, ready to push to the store.
pub type Payload = BTreeMap<AttributeId, FieldValue>;

/// Outcome of a full reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// The three-way classification the payloads were built from.
    pub classification: Classification,
    /// Update payloads keyed by object identity.
    pub updates: BTreeMap<ObjectId, Payload>,
    /// Create payloads keyed by source record key.
    pub creates: BTreeMap<String, Payload>,
    /// Warnings accumulated while resolving.
    pub warnings: Vec<SyncWarning>,
}

/// Binds one record batch to one target object type and drives the
/// classification and payload assembly.
///
/// The update and create accumulators live on the engine and stay
/// observable after a mid-loop failure, so partial progress is never
/// silently discarded.
#[derive(Debug)]
pub struct ReconciliationEngine {
    target_type_id: ObjectTypeId,
    batch: RecordBatch,
    /// Attribute name → id, restricted to names present in the batch.
    attribute_ids: BTreeMap<String, AttributeId>,
    /// Reference attribute name → referenced object type.
    reference_attributes: BTreeMap<String, ObjectTypeId>,
    update_payloads: BTreeMap<ObjectId, Payload>,
    create_payloads: BTreeMap<String, Payload>,
    warnings: Vec<SyncWarning>,
}

impl ReconciliationEngine {
    /// Bind a validated batch to a target object type.
    ///
    /// Fails with a NotFound error when any attribute name used by the
    /// batch is absent from the target's catalog.
    pub async fn bind(
        directory: &mut Directory,
        target_type_id: ObjectTypeId,
        batch: RecordBatch,
    ) -> SyncResult<Self> {
        let catalog = directory.attribute_catalog(target_type_id).await?;

        let mut attribute_ids = BTreeMap::new();
        for name in batch.attribute_names() {
            let definition =
                catalog
                    .find_by_name(&name)
                    .ok_or_else(|| SyncError::AttributeNotFound {
                        name: name.clone(),
                        object_type: target_type_id,
                    })?;
            attribute_ids.insert(name, definition.id);
        }

        let reference_attributes = catalog
            .iter()
            .filter(|definition| definition.kind.is_reference())
            .filter_map(|definition| {
                definition
                    .referenced_object_type_id
                    .map(|type_id| (definition.name.clone(), type_id))
            })
            .collect();

        Ok(Self {
            target_type_id,
            batch,
            attribute_ids,
            reference_attributes,
            update_payloads: BTreeMap::new(),
            create_payloads: BTreeMap::new(),
            warnings: Vec::new(),
        })
    }

    /// The target object type.
    #[must_use]
    pub fn target_type_id(&self) -> ObjectTypeId {
        self.target_type_id
    }

    /// The bound batch.
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Attribute name → id map derived at bind time.
    #[must_use]
    pub fn attribute_ids(&self) -> &BTreeMap<String, AttributeId> {
        &self.attribute_ids
    }

    /// Reference attribute name → referenced type map derived at bind time.
    #[must_use]
    pub fn reference_attributes(&self) -> &BTreeMap<String, ObjectTypeId> {
        &self.reference_attributes
    }

    /// Running update accumulator, observable mid-run.
    #[must_use]
    pub fn update_payloads(&self) -> &BTreeMap<ObjectId, Payload> {
        &self.update_payloads
    }

    /// Running create accumulator, observable mid-run.
    #[must_use]
    pub fn create_payloads(&self) -> &BTreeMap<String, Payload> {
        &self.create_payloads
    }

    /// Warnings accumulated so far.
    #[must_use]
    pub fn warnings(&self) -> &[SyncWarning] {
        &self.warnings
    }

    /// Classify the batch against the target's current population.
    pub async fn classify(&self, directory: &mut Directory) -> SyncResult<Classification> {
        let existing = directory.existing_labels(self.target_type_id).await?;
        Ok(classify(
            self.batch.keys(),
            existing.iter().map(String::as_str),
        ))
    }

    /// Build update payloads for every batch key with an existing object.
    ///
    /// Each payload is keyed by the matched object's identity and merged
    /// into the running accumulator; a later payload for the same identity
    /// fully replaces the earlier one.
    pub async fn build_update_payloads(
        &mut self,
        directory: &mut Directory,
    ) -> SyncResult<BTreeMap<ObjectId, Payload>> {
        let classification = self.classify(directory).await?;
        let mut result = BTreeMap::new();

        for name in &classification.to_update {
            let lookup = directory.lookup_by_name(self.target_type_id, name).await?;
            self.note_ambiguity(self.target_type_id, name, &lookup);
            let object = lookup
                .object
                .ok_or_else(|| SyncError::ObjectNotFound {
                    name: name.clone(),
                    object_type: self.target_type_id,
                })?;

            let Some(record) = self.batch.record(name).cloned() else {
                continue;
            };
            let payload = self.build_payload(directory, &record).await?;
            self.update_payloads.insert(object.id, payload.clone());
            result.insert(object.id, payload);
        }

        info!(
            object_type = %self.target_type_id,
            count = result.len(),
            "assembled update payloads"
        );
        Ok(result)
    }

    /// Build create payloads for every batch key without an existing
    /// object, keyed per source record.
    pub async fn build_create_payloads(
        &mut self,
        directory: &mut Directory,
    ) -> SyncResult<BTreeMap<String, Payload>> {
        let classification = self.classify(directory).await?;
        let mut result = BTreeMap::new();

        for name in &classification.to_create {
            let Some(record) = self.batch.record(name).cloned() else {
                continue;
            };
            let payload = self.build_payload(directory, &record).await?;
            self.create_payloads.insert(name.clone(), payload.clone());
            result.insert(name.clone(), payload);
        }

        info!(
            object_type = %self.target_type_id,
            count = result.len(),
            "assembled create payloads"
        );
        Ok(result)
    }

    /// Run the full pass: classify, then build both payload sets.
    pub async fn run(&mut self, directory: &mut Directory) -> SyncResult<SyncPlan> {
        let classification = self.classify(directory).await?;
        let updates = self.build_update_payloads(directory).await?;
        let creates = self.build_create_payloads(directory).await?;
        Ok(SyncPlan {
            classification,
            updates,
            creates,
            warnings: self.warnings.clone(),
        })
    }

    /// Push every accumulated update payload to the store, returning how
    /// many were submitted.
    pub async fn apply_updates(&self, directory: &mut Directory) -> SyncResult<usize> {
        for (&object_id, payload) in &self.update_payloads {
            directory
                .update_object(self.target_type_id, object_id, payload)
                .await?;
        }
        Ok(self.update_payloads.len())
    }

    /// Push every accumulated create payload to the store, returning how
    /// many objects were created.
    pub async fn apply_creates(&self, directory: &mut Directory) -> SyncResult<usize> {
        for payload in self.create_payloads.values() {
            directory.create_object(self.target_type_id, payload).await?;
        }
        Ok(self.create_payloads.len())
    }

    /// Assemble one record's attribute-id-keyed payload, resolving
    /// reference attributes.
    async fn build_payload(
        &mut self,
        directory: &mut Directory,
        record: &Record,
    ) -> SyncResult<Payload> {
        let mut payload = Payload::new();

        for (attribute_name, value) in record {
            let attribute_id = *self.attribute_ids.get(attribute_name).ok_or_else(|| {
                SyncError::AttributeNotFound {
                    name: attribute_name.clone(),
                    object_type: self.target_type_id,
                }
            })?;

            if let Some(&reference_type) = self.reference_attributes.get(attribute_name) {
                if let Some(resolved) = self
                    .resolve_reference(directory, reference_type, value)
                    .await?
                {
                    payload.insert(attribute_id, resolved);
                }
                // A created-on-demand reference is omitted for this run.
            } else {
                payload.insert(attribute_id, value.clone());
            }
        }

        Ok(payload)
    }

    /// Resolve a reference-valued field against the referenced type's
    /// population.
    ///
    /// Single values resolve to the matched object's natural key, or create
    /// the referenced object and return `None` (attribute omitted). List
    /// values resolve element-wise; a missing element is created from that
    /// element alone and skipped, and the remaining resolved keys are
    /// returned — possibly an empty list.
    async fn resolve_reference(
        &mut self,
        directory: &mut Directory,
        reference_type: ObjectTypeId,
        value: &FieldValue,
    ) -> SyncResult<Option<FieldValue>> {
        match value {
            FieldValue::One(name) => {
                let lookup = directory.lookup_by_name(reference_type, name).await?;
                self.note_ambiguity(reference_type, name, &lookup);
                match lookup.object {
                    Some(object) => Ok(Some(FieldValue::One(object.object_key))),
                    None => {
                        self.create_named(directory, reference_type, name).await?;
                        Ok(None)
                    }
                }
            }
            FieldValue::Many(names) => {
                let mut keys = Vec::new();
                for name in names {
                    let lookup = directory.lookup_by_name(reference_type, name).await?;
                    self.note_ambiguity(reference_type, name, &lookup);
                    match lookup.object {
                        Some(object) => keys.push(object.object_key),
                        None => {
                            self.create_named(directory, reference_type, name).await?;
                        }
                    }
                }
                Ok(Some(FieldValue::Many(keys)))
            }
        }
    }

    /// Create an object in the referenced type with only its name
    /// attribute set.
    async fn create_named(
        &mut self,
        directory: &mut Directory,
        object_type_id: ObjectTypeId,
        name: &str,
    ) -> SyncResult<StoredObject> {
        let name_attribute = directory.name_attribute_id(object_type_id).await?;
        let mut attributes = BTreeMap::new();
        attributes.insert(name_attribute, FieldValue::One(name.to_string()));
        info!(
            object_type = %object_type_id,
            name,
            "creating referenced object on demand"
        );
        directory.create_object(object_type_id, &attributes).await
    }

    fn note_ambiguity(&mut self, object_type: ObjectTypeId, name: &str, lookup: &NameLookup) {
        if lookup.matches > 1 {
            warn!(
                object_type = %object_type,
                name,
                matches = lookup.matches,
                "display name is ambiguous; first match wins"
            );
            self.warnings.push(SyncWarning::AmbiguousName {
                object_type,
                name: name.to_string(),
                matches: lookup.matches,
            });
        }
    }
}
