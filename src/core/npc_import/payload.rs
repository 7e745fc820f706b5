//! Payload decoding and encoding.
//!
//! The wire format is `<token> <JSON object>` on a single line. Decoding is
//! strict: no coercion, no defaults, anything but an object is refused.

use serde_json::{Map, Value};

use super::error::{ImportError, ImportResult};

/// Untyped decoded payload.
pub type RawDescriptor = Map<String, Value>;

/// Decode the text after the command token into an object map.
pub fn parse_payload(text: &str, max_bytes: Option<usize>) -> ImportResult<RawDescriptor> {
    if let Some(max) = max_bytes {
        if text.len() > max {
            return Err(ImportError::PayloadTooLarge {
                len: text.len(),
                max,
            });
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ImportError::invalid_payload(format!(
            "expected a JSON object, found {}",
            json_type_name(&other)
        ))),
        Err(e) => Err(ImportError::invalid_payload(e.to_string())),
    }
}

/// Render a payload as a chat command line.
pub fn encode_command(token: &str, payload: &RawDescriptor) -> String {
    // A map of JSON values always serializes.
    let json = Value::Object(payload.clone()).to_string();
    format!("{token} {json}")
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
