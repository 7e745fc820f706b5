//! Error types for the host collaborators.
//!
//! The record store is owned by the host; these errors describe why a write
//! or removal was refused so the importer can report it back to the requester.

use thiserror::Error;

use super::record::{RecordId, RecordKind};

/// Error returned by a [`RecordStore`](super::RecordStore) operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store refused to create a record.
    #[error("Store rejected {kind} record: {reason}")]
    Rejected { kind: RecordKind, reason: String },

    /// A dependent record referenced a parent the store does not hold.
    #[error("Unknown parent record: {0}")]
    UnknownParent(RecordId),

    /// Record not found in the store.
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// The store cannot serve requests at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a rejection error for the given record kind.
    pub fn rejected(kind: RecordKind, reason: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            reason: reason.into(),
        }
    }

    /// Create an unavailable error with the given message.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether the failure concerns a single record rather than the whole store.
    pub fn is_record_level(&self) -> bool {
        !matches!(self, Self::Unavailable(_))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
