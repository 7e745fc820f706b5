//! Record model shared by the importer and the host store.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field carrying the owning character's id on every dependent record.
pub const PARENT_FIELD: &str = "characterid";

/// Insertion-ordered record fields.
pub type Fields = IndexMap<String, Value>;

/// Opaque identifier assigned by the host store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The kinds of object the importer creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Primary record: the character itself.
    Character,
    /// Key/value attribute scoped to a character.
    Attribute,
    /// Free-text ability/note scoped to a character.
    Ability,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Attribute => "attribute",
            Self::Ability => "ability",
        }
    }

    /// Whether records of this kind must name a parent character.
    pub fn is_dependent(&self) -> bool {
        !matches!(self, Self::Character)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub fields: Fields,
}

impl NewRecord {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: Fields::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Scope this record to a parent character.
    pub fn with_parent(self, parent: &RecordId) -> Self {
        self.with(PARENT_FIELD, parent.as_str())
    }

    /// Parent id, if the record carries one.
    pub fn parent(&self) -> Option<RecordId> {
        self.fields
            .get(PARENT_FIELD)
            .and_then(Value::as_str)
            .map(RecordId::from)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// A record as held by the store, with its host-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub fields: Fields,
}

impl Record {
    pub fn parent(&self) -> Option<RecordId> {
        self.fields
            .get(PARENT_FIELD)
            .and_then(Value::as_str)
            .map(RecordId::from)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The `name` field, present on every record the importer writes.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }
}
