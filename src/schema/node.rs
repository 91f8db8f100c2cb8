use crate::error::{Result, WaspError};
use serde_json::{Map, Value};

/// Access a node as a mapping, failing explicitly on shape mismatch.
pub(crate) fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        WaspError::InvalidDefinition(format!("Expected '{}' to be a mapping", context))
    })
}

/// Access a node as a sequence, failing explicitly on shape mismatch.
pub(crate) fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        WaspError::InvalidDefinition(format!("Expected '{}' to be a sequence", context))
    })
}
