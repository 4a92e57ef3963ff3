//! Batch reconciliation of external records into the atlas asset store.
//!
//! Given an ordered batch of external tabular records and a target object
//! type, the engine decides which records update existing objects and which
//! create new ones, resolves reference-valued attributes through the object
//! graph (creating referenced objects on demand), and assembles
//! attribute-id-keyed payloads ready to push through the store API.
//!
//! ## Components
//!
//! - [`batch`] — the external data source: ordered records with a derived
//!   key index
//! - [`catalog`] — per-type attribute definitions and the type-code table
//! - [`codec`] — decoding of raw stored values into typed [`Value`]s
//! - [`object`] / [`index`] — the live population: per-type cached object
//!   stores behind a [`Directory`]
//! - [`engine`] — classification and payload assembly
//!
//! Everything is strictly sequential: collaborator calls are awaited one at
//! a time, a failed request aborts the run, and the engine's accumulators
//! remain observable afterwards.

pub mod batch;
pub mod catalog;
pub mod codec;
pub mod engine;
pub mod error;
pub mod index;
pub mod object;

pub use batch::{FieldValue, Record, RecordBatch, KEY_ATTRIBUTE};
pub use catalog::{AttributeCatalog, AttributeDefinition, AttributeKind};
pub use codec::Value;
pub use engine::{classify, Classification, Payload, ReconciliationEngine, SyncPlan, SyncWarning};
pub use error::{ErrorKind, SyncError, SyncResult};
pub use index::{Directory, NameLookup, ObjectStore, ObjectTypeInfo};
pub use object::StoredObject;
