//! Identifier types for the asset store API.
//!
//! Newtype wrappers for type-safe identifiers. The store's native ids are
//! 64-bit integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for an object schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(i64);

impl SchemaId {
    /// Wrap a raw schema id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner id value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SchemaId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for SchemaId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<SchemaId> for i64 {
    fn from(id: SchemaId) -> Self {
        id.0
    }
}

/// Unique identifier for an object type within a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTypeId(i64);

impl ObjectTypeId {
    /// Wrap a raw object type id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner id value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ObjectTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectTypeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for ObjectTypeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ObjectTypeId> for i64 {
    fn from(id: ObjectTypeId) -> Self {
        id.0
    }
}

/// Unique identifier for a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(i64);

impl ObjectId {
    /// Wrap a raw object id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner id value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for ObjectId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ObjectId> for i64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// Unique identifier for an attribute definition of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(i64);

impl AttributeId {
    /// Wrap a raw attribute id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner id value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AttributeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for AttributeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AttributeId> for i64 {
    fn from(id: AttributeId) -> Self {
        id.0
    }
}
