//! NPC Import Error Types
//!
//! Every stage of the import pipeline returns one of these. The handler turns
//! each of them, except `NotAddressedToUs`, into a single private
//! notification and a log event.

use thiserror::Error;

use crate::core::host::StoreError;

/// Generic text whispered back when schema validation fails.
pub const INVALID_NPC_DATA: &str = "Error: Invalid NPC data. Please check the JSON structure.";

// ============================================================================
// Validation Errors
// ============================================================================

/// Why a decoded payload was refused before anything was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required keys are absent.
    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Field present with the wrong JSON type (strict policy).
    #[error("Field '{field}' must be {expected}")]
    WrongType { field: String, expected: &'static str },

    /// Numeric field outside its allowed range (strict policy).
    #[error("Field '{field}' is {value}, expected {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The action list is empty (strict policy).
    #[error("Actions must be a non-empty list")]
    EmptyActions,

    /// An action entry is not an object with `name` and `description`.
    #[error("Action #{index} is malformed: {reason}")]
    MalformedAction { index: usize, reason: String },

    /// A list field exceeds the configured row limit.
    #[error("Field '{field}' has {len} entries, limit is {max}")]
    ListTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl ValidationError {
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }

    pub fn malformed_action(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedAction {
            index,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Import Errors
// ============================================================================

/// Errors produced while handling one inbound message.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The message is not the import command; ignored without a reply.
    #[error("Message is not addressed to the NPC importer")]
    NotAddressedToUs,

    /// The payload is not a JSON object.
    #[error("Invalid payload format: {0}")]
    InvalidPayloadFormat(String),

    /// The payload exceeds the configured size limit.
    #[error("Payload is {len} bytes, limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },

    /// Required fields are missing or malformed.
    #[error("Schema validation failed: {0}")]
    SchemaValidationFailed(#[from] ValidationError),

    /// The row id generator kept producing ids already used in this import.
    #[error("Could not allocate a unique row id after {attempts} attempts")]
    RowIdExhausted { attempts: usize },

    /// The host store refused a write part-way through materialization.
    #[error("{source}")]
    RecordStoreFailure {
        #[source]
        source: StoreError,
        /// Records written before the failure.
        written: usize,
        /// Whether the written records were removed again.
        rolled_back: bool,
    },
}

impl ImportError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayloadFormat(msg.into())
    }

    /// Whether the message should be dropped without replying.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotAddressedToUs)
    }

    /// Whether records may have been left behind in the store.
    pub fn may_leave_records(&self) -> bool {
        matches!(
            self,
            Self::RecordStoreFailure {
                written,
                rolled_back: false,
                ..
            } if *written > 0
        )
    }

    /// Text whispered back to the requester, or `None` for silent errors.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::NotAddressedToUs => None,
            Self::InvalidPayloadFormat(msg) => Some(format!("Error: Invalid JSON format. {msg}")),
            Self::PayloadTooLarge { len, max } => Some(format!(
                "Error: NPC payload is too large ({len} bytes, limit {max})."
            )),
            Self::SchemaValidationFailed(_) => Some(INVALID_NPC_DATA.to_string()),
            Self::RowIdExhausted { .. } | Self::RecordStoreFailure { .. } => {
                Some(format!("Error creating NPC: {self}"))
            }
        }
    }
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
