//! Sync error taxonomy.
//!
//! Four families: `NotFound` (a name has no match where one is required),
//! `Validation` (malformed input or catalog data), `Transport` (the store
//! said no — propagated unmodified, never retried), and `Ambiguity`
//! (duplicate display names under a strict lookup). Every error propagates
//! to the caller of the reconciliation operation; none are recovered
//! locally.

use thiserror::Error;

use atlas_store::ids::ObjectTypeId;
use atlas_store::StoreClientError;

use crate::catalog::AttributeKind;

/// Broad classification of a sync error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required name or identity has no match.
    NotFound,
    /// Input or catalog data violates the contract.
    Validation,
    /// The store returned a non-success response.
    Transport,
    /// A display name matched more than one object under strict lookup.
    Ambiguity,
}

/// Error produced by the sync layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A source attribute name has no match in the target catalog.
    #[error("attribute '{name}' not found in the catalog of object type {object_type}")]
    AttributeNotFound { name: String, object_type: ObjectTypeId },

    /// An object type was referenced but never registered in the directory.
    #[error("object type {0} is not registered in the directory")]
    ObjectTypeNotRegistered(ObjectTypeId),

    /// A strict lookup found no object with the given display name.
    #[error("no object named '{name}' in object type {object_type}")]
    ObjectNotFound { name: String, object_type: ObjectTypeId },

    /// A batch record lacks the configured key field.
    #[error("record at index {index} is missing the key field '{key_field}'")]
    MissingKeyField { index: usize, key_field: String },

    /// A batch record's key field holds a list instead of a single value.
    #[error("record at index {index}: key field '{key_field}' must be a single value")]
    InvalidKeyValue { index: usize, key_field: String },

    /// The catalog reported a type code outside the known table.
    #[error("unknown attribute type code {code}")]
    UnknownTypeCode { code: i64 },

    /// Outer type code 0 arrived without the inner default-type id.
    #[error("attribute type code 0 requires a default type id")]
    MissingDefaultType,

    /// A reference attribute definition names no target object type.
    #[error("attribute '{name}' is a reference but names no target object type")]
    MissingReferenceTarget { name: String },

    /// The attribute kind has no decode rule.
    #[error("attribute '{name}': values of kind {kind} cannot be decoded")]
    UnsupportedValueKind { name: String, kind: AttributeKind },

    /// A numeric attribute entry is present but carries no stored value.
    #[error("attribute '{name}': expected a stored {kind} value")]
    MissingStoredValue { name: String, kind: AttributeKind },

    /// A stored value does not parse as the attribute's kind.
    #[error("attribute '{name}': cannot parse '{value}' as {kind}")]
    InvalidStoredValue {
        name: String,
        value: String,
        kind: AttributeKind,
    },

    /// A reference-kind entry carries no referenced object.
    #[error("attribute '{name}': reference entry has no referenced object")]
    MalformedReference { name: String },

    /// A strict lookup matched more than one object.
    #[error("ambiguous display name '{name}': {matches} objects match in object type {object_type}")]
    AmbiguousName {
        name: String,
        matches: usize,
        object_type: ObjectTypeId,
    },

    /// The store rejected or failed a request.
    #[error(transparent)]
    Transport(#[from] StoreClientError),
}

impl SyncError {
    /// Classify this error into its taxonomy family.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::AttributeNotFound { .. }
            | SyncError::ObjectTypeNotRegistered(_)
            | SyncError::ObjectNotFound { .. } => ErrorKind::NotFound,
            SyncError::MissingKeyField { .. }
            | SyncError::InvalidKeyValue { .. }
            | SyncError::UnknownTypeCode { .. }
            | SyncError::MissingDefaultType
            | SyncError::MissingReferenceTarget { .. }
            | SyncError::UnsupportedValueKind { .. }
            | SyncError::MissingStoredValue { .. }
            | SyncError::InvalidStoredValue { .. }
            | SyncError::MalformedReference { .. } => ErrorKind::Validation,
            SyncError::AmbiguousName { .. } => ErrorKind::Ambiguity,
            SyncError::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
