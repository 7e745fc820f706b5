//! Record store seam and an in-memory host implementation.

use indexmap::IndexMap;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::{StoreError, StoreResult};
use super::record::{NewRecord, Record, RecordId, RecordKind};

/// The host's object store, as seen by the importer.
///
/// There is no multi-record transaction: each `create` is durable on its own.
pub trait RecordStore {
    /// Create one record and return it with its host-assigned id.
    fn create(&mut self, record: NewRecord) -> StoreResult<Record>;

    /// Remove one record. Removing a character cascades to its dependents.
    fn remove(&mut self, id: &RecordId) -> StoreResult<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn create(&mut self, record: NewRecord) -> StoreResult<Record> {
        (**self).create(record)
    }

    fn remove(&mut self, id: &RecordId) -> StoreResult<()> {
        (**self).remove(id)
    }
}

/// In-process record store keyed by uuid, preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: IndexMap<RecordId, Record>,
    writes: usize,
    fail_after: Option<usize>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every `create` once `writes` records have been written.
    pub fn with_failure_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    /// All records in creation order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn of_kind(&self, kind: RecordKind) -> impl Iterator<Item = &Record> {
        self.records.values().filter(move |r| r.kind == kind)
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Dependent records of one character, in creation order.
    pub fn children<'a>(&'a self, parent: &'a RecordId) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .values()
            .filter(move |r| r.parent().as_ref() == Some(parent))
    }

    /// Look up an attribute of a character by its name.
    pub fn attribute(&self, parent: &RecordId, name: &str) -> Option<&Record> {
        self.records.values().find(|r| {
            r.kind == RecordKind::Attribute
                && r.name() == Some(name)
                && r.parent().as_ref() == Some(parent)
        })
    }

    /// Find a character by display name.
    pub fn character_named(&self, name: &str) -> Option<&Record> {
        self.of_kind(RecordKind::Character)
            .find(|r| r.name() == Some(name))
    }

    fn check_parent(&self, record: &NewRecord) -> StoreResult<()> {
        if !record.kind.is_dependent() {
            return Ok(());
        }
        let parent = record
            .parent()
            .ok_or_else(|| StoreError::rejected(record.kind, "missing characterid"))?;
        match self.records.get(&parent) {
            Some(p) if p.kind == RecordKind::Character => Ok(()),
            _ => Err(StoreError::UnknownParent(parent)),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&mut self, record: NewRecord) -> StoreResult<Record> {
        if let Some(limit) = self.fail_after {
            if self.writes >= limit {
                return Err(StoreError::rejected(
                    record.kind,
                    format!("write limit of {limit} records reached"),
                ));
            }
        }
        self.check_parent(&record)?;

        let id = RecordId::from(Uuid::new_v4().to_string());
        let created = Record {
            id: id.clone(),
            kind: record.kind,
            fields: record.fields,
        };
        trace!(record_id = %id, kind = %created.kind, "record created");
        self.records.insert(id, created.clone());
        self.writes += 1;
        Ok(created)
    }

    fn remove(&mut self, id: &RecordId) -> StoreResult<()> {
        let removed = self
            .records
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if removed.kind == RecordKind::Character {
            let before = self.records.len();
            self.records.retain(|_, r| r.parent().as_ref() != Some(id));
            debug!(
                record_id = %id,
                dependents = before - self.records.len(),
                "character removed with dependents"
            );
        }
        Ok(())
    }
}
