//! Record materialization.
//!
//! A descriptor is first expanded into a [`RecordPlan`], with every row id
//! allocated up front, and only then written to the store. Write order is
//! fixed: the character, the nine scalar attributes, the repeating list rows,
//! the action rows, and finally the narrative ability.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::host::{Fields, NewRecord, RecordId, RecordKind, RecordStore, StoreError};

use super::descriptor::{NpcDescriptor, ACTION_GROUP};
use super::error::{ImportError, ImportResult};
use super::row_id::{RowIdAllocator, RowIdGenerator};

/// Name of the ability record holding the narrative block.
pub const NARRATIVE_ABILITY_NAME: &str = "Background & Personality";

/// What happens to already-written records when a later write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Leave them in the store.
    #[default]
    Direct,
    /// Remove them again, newest first.
    Compensate,
}

/// Name of one cell in a repeating group.
pub fn repeating_name(group: &str, row_id: &str, column: &str) -> String {
    format!("repeating_{group}_{row_id}_{column}")
}

/// A dependent record waiting for its parent id.
#[derive(Debug, Clone, PartialEq)]
struct PlannedRecord {
    kind: RecordKind,
    fields: Fields,
}

impl PlannedRecord {
    fn attribute(name: impl Into<String>, current: impl Into<serde_json::Value>) -> Self {
        let name: String = name.into();
        let record = NewRecord::new(RecordKind::Attribute)
            .with("name", name)
            .with("current", current);
        Self {
            kind: record.kind,
            fields: record.fields,
        }
    }

    fn into_record(self, parent: &RecordId) -> NewRecord {
        let mut record = NewRecord::new(self.kind).with_parent(parent);
        record.fields.extend(self.fields);
        record
    }
}

/// Every record one NPC expands into, not yet written.
#[derive(Debug, Clone)]
pub struct RecordPlan {
    character: NewRecord,
    dependents: Vec<PlannedRecord>,
    row_ids: Vec<String>,
}

impl RecordPlan {
    /// Expand a descriptor owned by `requester`.
    pub fn build<G>(
        npc: &NpcDescriptor,
        requester: &str,
        row_ids: &mut RowIdAllocator<'_, G>,
    ) -> ImportResult<Self>
    where
        G: RowIdGenerator + ?Sized,
    {
        let mut character = NewRecord::new(RecordKind::Character)
            .with("name", npc.name.as_str())
            .with("controlledby", requester);
        if let Some(url) = &npc.image_url {
            character = character.with("avatar", url.as_str());
        }
        let character = character
            .with("appearance", npc.appearance.as_str())
            .with("background", npc.background.as_str())
            .with("personality_traits", npc.personality_line());

        let mut dependents = Vec::with_capacity(10 + npc.list_rows() + 2 * npc.actions.len());
        let mut issued = Vec::new();

        for (name, value) in npc.scalar_attributes() {
            dependents.push(PlannedRecord::attribute(name, value.clone()));
        }

        for (group, column, items) in npc.repeating_lists() {
            for item in items {
                let row = row_ids.allocate()?;
                dependents.push(PlannedRecord::attribute(
                    repeating_name(group, &row, column),
                    item.as_str(),
                ));
                issued.push(row);
            }
        }

        for action in &npc.actions {
            let row = row_ids.allocate()?;
            dependents.push(PlannedRecord::attribute(
                repeating_name(ACTION_GROUP, &row, "name"),
                action.name.as_str(),
            ));
            dependents.push(PlannedRecord::attribute(
                repeating_name(ACTION_GROUP, &row, "description"),
                action.description.as_str(),
            ));
            issued.push(row);
        }

        let ability = NewRecord::new(RecordKind::Ability)
            .with("name", NARRATIVE_ABILITY_NAME)
            .with("action", npc.narrative());
        dependents.push(PlannedRecord {
            kind: ability.kind,
            fields: ability.fields,
        });

        Ok(Self {
            character,
            dependents,
            row_ids: issued,
        })
    }

    /// Total records the plan will write. Always includes the character and
    /// its narrative ability.
    pub fn record_count(&self) -> usize {
        1 + self.dependents.len()
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        let own = usize::from(self.character.kind == kind);
        own + self.dependents.iter().filter(|r| r.kind == kind).count()
    }

    /// Row ids allocated for list and action rows, in write order.
    pub fn row_ids(&self) -> &[String] {
        &self.row_ids
    }

    pub fn character(&self) -> &NewRecord {
        &self.character
    }

    /// Write the plan to `store`.
    pub fn commit<S>(self, store: &mut S, mode: CommitMode) -> ImportResult<MaterializationReport>
    where
        S: RecordStore + ?Sized,
    {
        let name = self.character.get_str("name").unwrap_or_default().to_string();
        let character = store
            .create(self.character)
            .map_err(|source| store_failure(source, 0, false))?;
        let parent = character.id;

        let mut written = vec![parent.clone()];
        let mut report = MaterializationReport {
            character_id: parent.clone(),
            name,
            attribute_records: 0,
            ability_records: 0,
        };

        for planned in self.dependents {
            let kind = planned.kind;
            match store.create(planned.into_record(&parent)) {
                Ok(record) => {
                    match kind {
                        RecordKind::Attribute => report.attribute_records += 1,
                        RecordKind::Ability => report.ability_records += 1,
                        RecordKind::Character => {}
                    }
                    written.push(record.id);
                }
                Err(source) => {
                    let rolled_back = match mode {
                        CommitMode::Direct => false,
                        CommitMode::Compensate => compensate(store, &written),
                    };
                    return Err(store_failure(source, written.len(), rolled_back));
                }
            }
        }

        debug!(
            character_id = %report.character_id,
            records = report.total_records(),
            "npc materialized"
        );
        Ok(report)
    }
}

/// Summary of a successful materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializationReport {
    pub character_id: RecordId,
    pub name: String,
    pub attribute_records: usize,
    pub ability_records: usize,
}

impl MaterializationReport {
    pub fn total_records(&self) -> usize {
        1 + self.attribute_records + self.ability_records
    }
}

fn store_failure(source: StoreError, written: usize, rolled_back: bool) -> ImportError {
    ImportError::RecordStoreFailure {
        source,
        written,
        rolled_back,
    }
}

/// Remove `written` newest first. Returns whether every removal succeeded.
fn compensate<S: RecordStore + ?Sized>(store: &mut S, written: &[RecordId]) -> bool {
    let mut clean = true;
    for id in written.iter().rev() {
        if let Err(e) = store.remove(id) {
            warn!(record_id = %id, error = %e, "could not remove record during rollback");
            clean = false;
        }
    }
    clean
}
