use crate::error::{Result, WaspError};
use crate::schema::document::{SpecDocument, SpecVersion};
use crate::schema::node;
use indexmap::IndexMap;
use serde_json::Value;

/// Upper bound on `$ref`/`allOf` resolution depth. A malformed document can
/// declare a cyclic reference chain; past this depth resolution fails instead
/// of recursing further.
pub(crate) const MAX_RESOLUTION_DEPTH: usize = 32;

/// Resolves `#/...` pointers into concrete schema nodes.
///
/// OpenAPI 3 pointers address `#/<section>/<group>/<name>`; Swagger 2
/// pointers are one level shorter, `#/<section>/<name>`. The resolved node is
/// returned with any `allOf` composite flattened into a plain property map,
/// so callers only ever see a `$ref`-free, `allOf`-free schema.
pub struct DefinitionResolver<'a> {
    document: &'a SpecDocument,
}

impl<'a> DefinitionResolver<'a> {
    pub fn new(document: &'a SpecDocument) -> Self {
        Self { document }
    }

    pub fn resolve(&self, pointer: &str) -> Result<Value> {
        self.resolve_at_depth(pointer, 0)
    }

    pub(crate) fn resolve_at_depth(&self, pointer: &str, depth: usize) -> Result<Value> {
        if depth > MAX_RESOLUTION_DEPTH {
            return Err(WaspError::ReferenceCycle(format!(
                "Resolution of '{}' exceeded {} levels of references",
                pointer, MAX_RESOLUTION_DEPTH
            )));
        }

        let segments: Vec<&str> = pointer.split('/').collect();
        let segment_count = match self.document.version() {
            SpecVersion::V2 => 3,
            SpecVersion::V3 => 4,
        };

        if segments.len() < segment_count || segments[0] != "#" {
            return Err(WaspError::InvalidDefinition(format!(
                "Invalid component reference '{}'",
                pointer
            )));
        }

        let mut target = self.document.root();
        for segment in &segments[1..segment_count] {
            target = target.get(*segment).ok_or_else(|| {
                WaspError::DefinitionNotFound(format!("Component '{}' not found", pointer))
            })?;
        }

        let mut definition = target.clone();
        if definition.get("allOf").is_some() {
            self.flatten_all_of(&mut definition, pointer, depth)?;
        }

        tracing::debug!(pointer, "resolved component definition");
        Ok(definition)
    }

    /// Replace an `allOf` composite with the union of its branches'
    /// properties. Branches merge in declared order; a later branch
    /// overwrites an earlier one on key collision. A branch that is itself a
    /// `$ref` is resolved first.
    fn flatten_all_of(&self, definition: &mut Value, pointer: &str, depth: usize) -> Result<()> {
        let Some(object) = definition.as_object_mut() else {
            return Err(WaspError::InvalidDefinition(format!(
                "Component '{}' is not a mapping",
                pointer
            )));
        };

        let branches = object.remove("allOf").unwrap_or(Value::Null);
        let branches = node::as_array(&branches, "allOf")?;

        let mut properties: IndexMap<String, Value> = IndexMap::new();
        for branch in branches {
            let resolved;
            let branch = if let Some(reference) = branch.get("$ref").and_then(Value::as_str) {
                resolved = self.resolve_at_depth(reference, depth + 1)?;
                &resolved
            } else {
                branch
            };

            if let Some(branch_properties) = branch.get("properties") {
                for (key, value) in node::as_object(branch_properties, "properties")? {
                    properties.insert(key.clone(), value.clone());
                }
            }
        }

        object.insert(
            "properties".to_string(),
            Value::Object(properties.into_iter().collect()),
        );

        Ok(())
    }
}
