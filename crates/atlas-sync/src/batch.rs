//! Record batches: the external data source side of a reconciliation run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Default key field of a record batch.
pub const KEY_ATTRIBUTE: &str = "Name";

/// A source field value: a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single value.
    One(String),
    /// Ordered list of values.
    Many(Vec<String>),
}

impl FieldValue {
    /// Get the single value, if this is one.
    #[must_use]
    pub fn as_one(&self) -> Option<&str> {
        match self {
            FieldValue::One(value) => Some(value),
            FieldValue::Many(_) => None,
        }
    }

    /// Get the list of values, if this is one.
    #[must_use]
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            FieldValue::One(_) => None,
            FieldValue::Many(values) => Some(values),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::One(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::One(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// One external record: attribute name to raw value.
pub type Record = BTreeMap<String, FieldValue>;

/// An ordered collection of external records plus a derived key index.
///
/// The index maps each record's key-field value to the record; a later
/// record with a duplicate key overwrites the earlier one in the index
/// (last write wins), while the ordered sequence retains both. A record
/// missing the key field, or carrying a list there, fails validation.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    records: Vec<Record>,
    key_field: String,
    keyed: BTreeMap<String, usize>,
}

impl RecordBatch {
    /// Build a batch keyed by [`KEY_ATTRIBUTE`].
    pub fn new(records: Vec<Record>) -> SyncResult<Self> {
        Self::with_key_field(records, KEY_ATTRIBUTE)
    }

    /// Build a batch keyed by a chosen field.
    pub fn with_key_field(records: Vec<Record>, key_field: &str) -> SyncResult<Self> {
        let mut keyed = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            match record.get(key_field) {
                None => {
                    return Err(SyncError::MissingKeyField {
                        index,
                        key_field: key_field.to_string(),
                    })
                }
                Some(FieldValue::Many(_)) => {
                    return Err(SyncError::InvalidKeyValue {
                        index,
                        key_field: key_field.to_string(),
                    })
                }
                Some(FieldValue::One(key)) => {
                    keyed.insert(key.clone(), index);
                }
            }
        }
        Ok(Self {
            records,
            key_field: key_field.to_string(),
            keyed,
        })
    }

    /// The key field this batch is indexed by.
    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Distinct key values, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keyed.keys().map(String::as_str)
    }

    /// Look up the record for a key value (last record wins on duplicates).
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&Record> {
        self.keyed.get(key).map(|&index| &self.records[index])
    }

    /// All records in source order, duplicates included.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Union of attribute names across all records.
    #[must_use]
    pub fn attribute_names(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect()
    }

    /// Number of records in the batch (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
