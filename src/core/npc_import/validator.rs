//! Schema validation for decoded NPC payloads.
//!
//! The default policy only checks that every required key is present: a key
//! holding `0`, `""`, `[]` or `null` passes. The strict policy adds type and
//! range checks. Both policies enforce the list length limit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::descriptor::{
    ABILITY_FIELDS, ACTIONS_FIELD, LIST_FIELDS, PERSONALITY_FIELD, REQUIRED_FIELDS, TEXT_FIELDS,
};
use super::error::ValidationError;
use super::payload::RawDescriptor;

/// Ability score bounds under the strict policy.
pub const ABILITY_RANGE: (i64, i64) = (3, 20);
/// Character level bounds under the strict policy.
pub const LEVEL_RANGE: (i64, i64) = (1, 20);

/// How thoroughly a payload is checked before materialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Required keys must exist; values are not inspected.
    #[default]
    Presence,
    /// Required keys must exist with the expected types and ranges.
    Strict,
}

/// Checks a decoded payload against the NPC schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    policy: ValidationPolicy,
    max_list_len: Option<usize>,
}

impl SchemaValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            max_list_len: None,
        }
    }

    /// Refuse list fields with more than `max` entries.
    pub fn with_max_list_len(mut self, max: Option<usize>) -> Self {
        self.max_list_len = max;
        self
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn validate(&self, raw: &RawDescriptor) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !raw.contains_key(*field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if let Some(max) = self.max_list_len {
            check_list_lengths(raw, max)?;
        }

        match self.policy {
            ValidationPolicy::Presence => Ok(()),
            ValidationPolicy::Strict => check_strict(raw),
        }
    }
}

fn check_list_lengths(raw: &RawDescriptor, max: usize) -> Result<(), ValidationError> {
    let lists = LIST_FIELDS
        .iter()
        .map(|(field, _, _)| *field)
        .chain([PERSONALITY_FIELD, ACTIONS_FIELD]);
    for field in lists {
        if let Some(Value::Array(items)) = raw.get(field) {
            if items.len() > max {
                return Err(ValidationError::ListTooLong {
                    field,
                    len: items.len(),
                    max,
                });
            }
        }
    }
    Ok(())
}

fn check_strict(raw: &RawDescriptor) -> Result<(), ValidationError> {
    for field in TEXT_FIELDS {
        if !raw[field].is_string() {
            return Err(ValidationError::wrong_type(field, "a string"));
        }
    }
    if raw["name"].as_str().is_some_and(|s| s.trim().is_empty()) {
        return Err(ValidationError::wrong_type("name", "a non-empty string"));
    }

    check_int(raw, "level", LEVEL_RANGE)?;
    for field in ABILITY_FIELDS {
        check_int(raw, field, ABILITY_RANGE)?;
    }

    let string_lists = LIST_FIELDS
        .iter()
        .map(|(field, _, _)| *field)
        .chain([PERSONALITY_FIELD]);
    for field in string_lists {
        let ok = raw[field]
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string));
        if !ok {
            return Err(ValidationError::wrong_type(field, "a list of strings"));
        }
    }

    let actions = raw[ACTIONS_FIELD]
        .as_array()
        .ok_or_else(|| ValidationError::wrong_type(ACTIONS_FIELD, "a list of actions"))?;
    if actions.is_empty() {
        return Err(ValidationError::EmptyActions);
    }
    for (index, action) in actions.iter().enumerate() {
        let obj = action
            .as_object()
            .ok_or_else(|| ValidationError::malformed_action(index, "not an object"))?;
        for key in ["name", "description"] {
            match obj.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(ValidationError::malformed_action(
                        index,
                        format!("'{key}' must be a string"),
                    ))
                }
                None => {
                    return Err(ValidationError::malformed_action(
                        index,
                        format!("missing '{key}'"),
                    ))
                }
            }
        }
    }
    Ok(())
}

fn check_int(raw: &RawDescriptor, field: &str, (min, max): (i64, i64)) -> Result<(), ValidationError> {
    let value = raw[field]
        .as_i64()
        .ok_or_else(|| ValidationError::wrong_type(field, "an integer"))?;
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
