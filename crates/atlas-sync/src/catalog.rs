//! Attribute catalog: typed attribute definitions per object type.
//!
//! The store encodes attribute types on two levels: an outer type code
//! either selects a concrete kind directly, or (code 0) defers to an inner
//! default-type id for the scalar kinds. [`AttributeKind::resolve`] is the
//! single process-wide decoding of that table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use atlas_store::ids::{AttributeId, ObjectTypeId};
use atlas_store::models::AttributeRecord;

use crate::error::{SyncError, SyncResult};

/// Resolved type of an attribute definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Text,
    Integer,
    Boolean,
    Double,
    Date,
    Time,
    DateTime,
    Url,
    Email,
    Textarea,
    Select,
    IpAddress,
    Object,
    User,
    Confluence,
    Group,
    Version,
    Project,
    Status,
}

impl AttributeKind {
    /// Resolve the store's two-level type encoding into a kind.
    ///
    /// Outer code 0 selects a scalar kind through `default_type_id`; any
    /// other known outer code maps directly. Code 0 without a default-type
    /// id, or a code outside the table, is a Validation error.
    pub fn resolve(type_code: i64, default_type_id: Option<i64>) -> SyncResult<Self> {
        match type_code {
            0 => match default_type_id {
                None => Err(SyncError::MissingDefaultType),
                Some(0) => Ok(AttributeKind::Text),
                Some(1) => Ok(AttributeKind::Integer),
                Some(2) => Ok(AttributeKind::Boolean),
                Some(3) => Ok(AttributeKind::Double),
                Some(4) => Ok(AttributeKind::Date),
                Some(5) => Ok(AttributeKind::Time),
                Some(6) => Ok(AttributeKind::DateTime),
                Some(7) => Ok(AttributeKind::Url),
                Some(8) => Ok(AttributeKind::Email),
                Some(9) => Ok(AttributeKind::Textarea),
                Some(10) => Ok(AttributeKind::Select),
                Some(11) => Ok(AttributeKind::IpAddress),
                Some(code) => Err(SyncError::UnknownTypeCode { code }),
            },
            1 => Ok(AttributeKind::Object),
            2 => Ok(AttributeKind::User),
            3 => Ok(AttributeKind::Confluence),
            4 => Ok(AttributeKind::Group),
            5 => Ok(AttributeKind::Version),
            6 => Ok(AttributeKind::Project),
            7 => Ok(AttributeKind::Status),
            code => Err(SyncError::UnknownTypeCode { code }),
        }
    }

    /// Get the display tag of this kind, as the store renders it.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Text => "Text",
            AttributeKind::Integer => "Integer",
            AttributeKind::Boolean => "Boolean",
            AttributeKind::Double => "Double",
            AttributeKind::Date => "Date",
            AttributeKind::Time => "Time",
            AttributeKind::DateTime => "Date Time",
            AttributeKind::Url => "URL",
            AttributeKind::Email => "Email",
            AttributeKind::Textarea => "Textarea",
            AttributeKind::Select => "Select",
            AttributeKind::IpAddress => "IP Address",
            AttributeKind::Object => "Object",
            AttributeKind::User => "User",
            AttributeKind::Confluence => "Confluence",
            AttributeKind::Group => "Group",
            AttributeKind::Version => "Version",
            AttributeKind::Project => "Project",
            AttributeKind::Status => "Status",
        }
    }

    /// Whether values of this kind reference other objects in the graph.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, AttributeKind::Object)
    }

    /// Whether values of this kind are ordered sequences.
    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            AttributeKind::Object | AttributeKind::User | AttributeKind::Select
        )
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributeKind {
    type Err = ParseAttributeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(AttributeKind::Text),
            "Integer" => Ok(AttributeKind::Integer),
            "Boolean" => Ok(AttributeKind::Boolean),
            "Double" => Ok(AttributeKind::Double),
            "Date" => Ok(AttributeKind::Date),
            "Time" => Ok(AttributeKind::Time),
            "Date Time" => Ok(AttributeKind::DateTime),
            "URL" => Ok(AttributeKind::Url),
            "Email" => Ok(AttributeKind::Email),
            "Textarea" => Ok(AttributeKind::Textarea),
            "Select" => Ok(AttributeKind::Select),
            "IP Address" => Ok(AttributeKind::IpAddress),
            "Object" => Ok(AttributeKind::Object),
            "User" => Ok(AttributeKind::User),
            "Confluence" => Ok(AttributeKind::Confluence),
            "Group" => Ok(AttributeKind::Group),
            "Version" => Ok(AttributeKind::Version),
            "Project" => Ok(AttributeKind::Project),
            "Status" => Ok(AttributeKind::Status),
            _ => Err(ParseAttributeKindError(s.to_string())),
        }
    }
}

/// Error parsing an attribute kind from its display tag.
#[derive(Debug, Clone)]
pub struct ParseAttributeKindError(String);

impl fmt::Display for ParseAttributeKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid attribute kind '{}'", self.0)
    }
}

impl std::error::Error for ParseAttributeKindError {}

/// A validated attribute definition of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    /// Id of this definition.
    pub id: AttributeId,

    /// Attribute name, unique within the owning object type.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Resolved kind.
    pub kind: AttributeKind,

    /// Target object type, present exactly when `kind` is `Object`.
    pub referenced_object_type_id: Option<ObjectTypeId>,
}

impl AttributeDefinition {
    /// Validate a wire record into a definition.
    ///
    /// A reference-kind record without a target object type is rejected.
    pub fn from_record(record: AttributeRecord) -> SyncResult<Self> {
        let kind = AttributeKind::resolve(record.type_code, record.default_type_id)?;
        if kind.is_reference() && record.referenced_object_type_id.is_none() {
            return Err(SyncError::MissingReferenceTarget { name: record.name });
        }
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            kind,
            referenced_object_type_id: record.referenced_object_type_id,
        })
    }
}

/// The attribute catalog of one object type: id-keyed definitions with
/// name lookup.
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    by_id: BTreeMap<AttributeId, AttributeDefinition>,
}

impl AttributeCatalog {
    /// Validate a set of wire records into a catalog.
    pub fn from_records(records: Vec<AttributeRecord>) -> SyncResult<Self> {
        let mut by_id = BTreeMap::new();
        for record in records {
            let definition = AttributeDefinition::from_record(record)?;
            by_id.insert(definition.id, definition);
        }
        Ok(Self { by_id })
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: AttributeId) -> Option<&AttributeDefinition> {
        self.by_id.get(&id)
    }

    /// Find a definition by name; first match wins.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&AttributeDefinition> {
        self.by_id.values().find(|definition| definition.name == name)
    }

    /// Iterate over all definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.by_id.values()
    }

    /// Number of definitions in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scalar_kinds() {
        assert_eq!(
            AttributeKind::resolve(0, Some(0)).unwrap(),
            AttributeKind::Text
        );
        assert_eq!(
            AttributeKind::resolve(0, Some(2)).unwrap(),
            AttributeKind::Boolean
        );
        assert_eq!(
            AttributeKind::resolve(0, Some(6)).unwrap(),
            AttributeKind::DateTime
        );
        assert_eq!(
            AttributeKind::resolve(0, Some(11)).unwrap(),
            AttributeKind::IpAddress
        );
    }

    #[test]
    fn test_resolve_direct_kinds() {
        assert_eq!(AttributeKind::resolve(1, None).unwrap(), AttributeKind::Object);
        assert_eq!(AttributeKind::resolve(7, None).unwrap(), AttributeKind::Status);
        // The inner id is ignored for direct codes.
        assert_eq!(
            AttributeKind::resolve(2, Some(3)).unwrap(),
            AttributeKind::User
        );
    }

    #[test]
    fn test_resolve_code_zero_requires_default_type() {
        let err = AttributeKind::resolve(0, None).unwrap_err();
        assert!(matches!(err, SyncError::MissingDefaultType));
    }

    #[test]
    fn test_resolve_unknown_codes_fail() {
        assert!(matches!(
            AttributeKind::resolve(8, None).unwrap_err(),
            SyncError::UnknownTypeCode { code: 8 }
        ));
        assert!(matches!(
            AttributeKind::resolve(0, Some(12)).unwrap_err(),
            SyncError::UnknownTypeCode { code: 12 }
        ));
    }

    #[test]
    fn test_kind_display_roundtrip() {
        for kind in [
            AttributeKind::Text,
            AttributeKind::DateTime,
            AttributeKind::IpAddress,
            AttributeKind::Status,
        ] {
            assert_eq!(kind.as_str().parse::<AttributeKind>().unwrap(), kind);
        }
        assert!("Widget".parse::<AttributeKind>().is_err());
    }

    fn record(id: i64, name: &str, type_code: i64) -> AttributeRecord {
        AttributeRecord {
            id: AttributeId::new(id),
            name: name.to_string(),
            description: None,
            type_code,
            default_type_id: if type_code == 0 { Some(0) } else { None },
            referenced_object_type_id: None,
        }
    }

    #[test]
    fn test_definition_reference_requires_target() {
        let err = AttributeDefinition::from_record(record(5, "Manager", 1)).unwrap_err();
        assert!(matches!(err, SyncError::MissingReferenceTarget { .. }));

        let mut with_target = record(5, "Manager", 1);
        with_target.referenced_object_type_id = Some(ObjectTypeId::new(20));
        let definition = AttributeDefinition::from_record(with_target).unwrap();
        assert!(definition.kind.is_reference());
        assert_eq!(
            definition.referenced_object_type_id,
            Some(ObjectTypeId::new(20))
        );
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = AttributeCatalog::from_records(vec![
            record(1, "Name", 0),
            record(2, "Team", 0),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find_by_name("Team").unwrap().id,
            AttributeId::new(2)
        );
        assert!(catalog.find_by_name("Missing").is_none());
        assert_eq!(catalog.get(AttributeId::new(1)).unwrap().name, "Name");
    }
}
