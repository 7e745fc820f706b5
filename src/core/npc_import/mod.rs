//! NPC import pipeline.
//!
//! Turns a `!create-npc <JSON>` chat command into a character record plus
//! its dependent attribute and ability records.
//!
//! ```text
//! InboundMessage
//!   -> CommandMatcher   (strip "!create-npc")
//!   -> parse_payload    (strict JSON object)
//!   -> SchemaValidator  (required fields, optional strict typing)
//!   -> NpcDescriptor    (lenient typed view)
//!   -> RecordPlan       (every record staged, row ids allocated)
//!   -> RecordStore      (written in fixed order)
//!   -> Notifier         (private success or error whisper)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use npc_bridge::core::host::{InMemoryRecordStore, InboundMessage, RecordingNotifier};
//! use npc_bridge::core::npc_import::{ImporterOptions, NpcImporter, RandomRowIds};
//!
//! let mut importer = NpcImporter::new(
//!     ImporterOptions::default(),
//!     InMemoryRecordStore::new(),
//!     RecordingNotifier::new(),
//!     RandomRowIds::new(),
//! );
//! let outcome = importer.handle(&InboundMessage::api("player-1", "!create-npc {}"));
//! assert!(!outcome.is_created());
//! assert_eq!(importer.notifier().len(), 1);
//! ```

pub mod command;
pub mod descriptor;
pub mod error;
pub mod handler;
pub mod materializer;
pub mod payload;
pub mod row_id;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{CommandMatcher, DEFAULT_COMMAND};
pub use descriptor::{ActionDescriptor, NpcDescriptor, REQUIRED_FIELDS};
pub use error::{ImportError, ImportResult, ValidationError, INVALID_NPC_DATA};
pub use handler::{HandleOutcome, ImporterOptions, NpcImporter, DEFAULT_SENDER};
pub use materializer::{
    repeating_name, CommitMode, MaterializationReport, RecordPlan, NARRATIVE_ABILITY_NAME,
};
pub use payload::{encode_command, parse_payload, RawDescriptor};
pub use row_id::{RandomRowIds, RowIdAllocator, RowIdGenerator, SequentialRowIds};
pub use validator::{SchemaValidator, ValidationPolicy};
