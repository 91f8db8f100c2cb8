use crate::error::{Result, WaspError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parse a raw specification document into a generic value tree.
///
/// The text is tried as JSON first and as YAML second, since OpenAPI documents
/// are published in either dialect. Mapping key order is preserved; path
/// template matching and content-type selection depend on declaration order.
pub fn parse_spec(text: &str) -> Result<Value> {
    if let Ok(root) = serde_json::from_str::<Value>(text) {
        tracing::debug!("specification parsed as JSON");
        return Ok(root);
    }

    match serde_yaml::from_str::<Value>(text) {
        Ok(root) => {
            tracing::debug!("specification parsed as YAML");
            Ok(root)
        }
        Err(e) => Err(WaspError::SchemaParse(format!(
            "Document is neither valid JSON nor valid YAML: {}",
            e
        ))),
    }
}

/// Load a specification document from a file.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        WaspError::SchemaParse(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    parse_spec(&content)
}
