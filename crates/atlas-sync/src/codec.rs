//! Value codec: decodes raw per-attribute value payloads into typed values.
//!
//! The decode contract, by resolved kind:
//! - empty raw values decode to [`Value::None`] for every kind;
//! - Text, URL, Email, Textarea, Date, Date Time pass the stored string
//!   through unchanged;
//! - Integer and Double parse the stored string; an entry with no stored
//!   value is a contract violation for these;
//! - Boolean is `true` only for the literal `"true"` — anything else,
//!   including absence, is `false` (lossy, kept as-is);
//! - Status passes the embedded sub-value through;
//! - User and Select collect the per-entry stored values in order;
//! - Object hydrates each referenced object by id;
//! - every other kind fails explicitly.

use tracing::debug;

use atlas_store::models::AttributeValueEntry;
use atlas_store::StoreClient;

use crate::catalog::{AttributeDefinition, AttributeKind};
use crate::error::{SyncError, SyncResult};
use crate::object::StoredObject;

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No stored value.
    None,
    /// Scalar string kinds (Text, URL, Email, Textarea, Date, Date Time).
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    /// Embedded status sub-value, as stored.
    Status(serde_json::Value),
    /// Ordered User/Select values.
    Many(Vec<String>),
    /// Ordered hydrated reference targets.
    Objects(Vec<StoredObject>),
}

impl Value {
    /// Whether this is the no-value marker.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get the scalar string, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the boolean, if this is one.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }
}

/// Decode raw stored values according to an attribute definition.
///
/// Reference-kind attributes fetch each referenced object through `client`;
/// hydrated objects keep their own attributes raw, so decoding one level
/// never recurses further.
pub async fn decode(
    client: &StoreClient,
    definition: &AttributeDefinition,
    raw: &[AttributeValueEntry],
) -> SyncResult<Value> {
    if raw.is_empty() {
        return Ok(Value::None);
    }

    match definition.kind {
        AttributeKind::Object => {
            let mut objects = Vec::with_capacity(raw.len());
            for entry in raw {
                let reference = entry.referenced_object.as_ref().ok_or_else(|| {
                    SyncError::MalformedReference {
                        name: definition.name.clone(),
                    }
                })?;
                debug!(attribute = %definition.name, id = %reference.id, "hydrating referenced object");
                let record = client.get_object(reference.id).await?;
                objects.push(StoredObject::from_record(record));
            }
            Ok(Value::Objects(objects))
        }
        _ => decode_plain(definition, raw),
    }
}

/// Decode every kind that needs no store access.
fn decode_plain(
    definition: &AttributeDefinition,
    raw: &[AttributeValueEntry],
) -> SyncResult<Value> {
    let first = &raw[0];
    match definition.kind {
        AttributeKind::Text
        | AttributeKind::Url
        | AttributeKind::Email
        | AttributeKind::Textarea
        | AttributeKind::Date
        | AttributeKind::DateTime => Ok(first
            .value
            .clone()
            .map_or(Value::None, Value::Text)),

        AttributeKind::Integer => {
            let stored = first.value.as_deref().ok_or_else(|| missing(definition))?;
            stored
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| unparseable(definition, stored))
        }

        AttributeKind::Double => {
            let stored = first.value.as_deref().ok_or_else(|| missing(definition))?;
            stored
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| unparseable(definition, stored))
        }

        AttributeKind::Boolean => Ok(Value::Boolean(first.value.as_deref() == Some("true"))),

        AttributeKind::Status => Ok(first
            .status
            .clone()
            .map_or(Value::None, Value::Status)),

        AttributeKind::User | AttributeKind::Select => Ok(Value::Many(
            raw.iter().filter_map(|entry| entry.value.clone()).collect(),
        )),

        AttributeKind::Object => unreachable!("handled by decode"),

        AttributeKind::Time
        | AttributeKind::IpAddress
        | AttributeKind::Confluence
        | AttributeKind::Group
        | AttributeKind::Version
        | AttributeKind::Project => Err(SyncError::UnsupportedValueKind {
            name: definition.name.clone(),
            kind: definition.kind,
        }),
    }
}

fn missing(definition: &AttributeDefinition) -> SyncError {
    SyncError::MissingStoredValue {
        name: definition.name.clone(),
        kind: definition.kind,
    }
}

fn unparseable(definition: &AttributeDefinition, stored: &str) -> SyncError {
    SyncError::InvalidStoredValue {
        name: definition.name.clone(),
        value: stored.to_string(),
        kind: definition.kind,
    }
}
