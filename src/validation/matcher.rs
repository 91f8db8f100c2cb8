use crate::error::{Result, WaspError};
use crate::schema::definition::{DefinitionResolver, MAX_RESOLUTION_DEPTH};
use crate::schema::document::SpecDocument;
use crate::schema::node;
use serde_json::{Map, Value};

/// Recursive comparator between a JSON value and a resolved schema node.
///
/// `$ref` indirection is resolved first, then null values are settled, and
/// only then is the declared `type` consulted. The `name` carried through
/// recursion is the dotted/indexed field path reported on failure.
pub struct SchemaMatcher<'a> {
    document: &'a SpecDocument,
}

impl<'a> SchemaMatcher<'a> {
    pub fn new(document: &'a SpecDocument) -> Self {
        Self { document }
    }

    pub fn match_value(&self, name: &str, schema: &Value, body: &Value) -> Result<()> {
        self.match_at_depth(name, schema, body, 0)
    }

    fn match_at_depth(&self, name: &str, schema: &Value, body: &Value, depth: usize) -> Result<()> {
        if depth > MAX_RESOLUTION_DEPTH {
            return Err(WaspError::ReferenceCycle(format!(
                "Matching '{}' exceeded {} levels of schema nesting",
                name, MAX_RESOLUTION_DEPTH
            )));
        }

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            let definition =
                DefinitionResolver::new(self.document).resolve_at_depth(reference, depth)?;
            return self.match_at_depth(name, &definition, body, depth + 1);
        }

        if body.is_null() {
            return self.match_null(name, schema);
        }

        match schema.get("type").and_then(Value::as_str) {
            Some("object") => self.match_object(name, schema, body, depth),
            Some("array") => self.match_array(name, schema, body, depth),
            Some("integer") => match_integer(name, body),
            Some("number") => match_number(name, body),
            Some("string") => match_string(name, schema, body),
            Some("boolean") => match_boolean(name, body),
            // An untagged property map is still an object schema.
            _ if schema.get("properties").is_some() => self.match_object(name, schema, body, depth),
            Some(other) => Err(WaspError::InvalidDefinition(format!(
                "Schema for '{}' declares unsupported type '{}'",
                name, other
            ))),
            None => Err(WaspError::InvalidDefinition(format!(
                "Schema for '{}' declares no type",
                name
            ))),
        }
    }

    /// A null value only matches a schema that allows it: `nullable: true` in
    /// OpenAPI 3, or the document-wide leniency flag for Swagger 2.
    fn match_null(&self, name: &str, schema: &Value) -> Result<()> {
        let nullable = schema
            .get("nullable")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if nullable || self.document.allow_null_values() {
            return Ok(());
        }

        Err(WaspError::NotMatched(format!(
            "Value of property '{}' is null, but the schema does not allow null",
            name
        )))
    }

    fn match_object(&self, name: &str, schema: &Value, body: &Value, depth: usize) -> Result<()> {
        let Some(body) = body.as_object() else {
            return Err(WaspError::NotMatched(format!(
                "Expected '{}' to be an object, found '{}'",
                name, body
            )));
        };

        let empty = Map::new();
        let properties = match schema.get("properties") {
            Some(properties) => node::as_object(properties, name)?,
            None => &empty,
        };

        if let Some(required) = schema.get("required") {
            for entry in node::as_array(required, name)? {
                let property = entry.as_str().ok_or_else(|| {
                    WaspError::InvalidDefinition(format!(
                        "Required list of '{}' holds a non-string entry",
                        name
                    ))
                })?;

                if !body.contains_key(property) {
                    return Err(WaspError::NotMatched(format!(
                        "Required property '{}' in '{}' not found in body",
                        property, name
                    )));
                }
            }
        }

        for (property, property_schema) in properties {
            if let Some(value) = body.get(property) {
                self.match_at_depth(
                    &format!("{}.{}", name, property),
                    property_schema,
                    value,
                    depth + 1,
                )?;
            }
        }

        let undeclared: Vec<(&String, &Value)> = body
            .iter()
            .filter(|(property, _)| !properties.contains_key(*property))
            .collect();

        if undeclared.is_empty() {
            return Ok(());
        }

        match schema.get("additionalProperties") {
            Some(Value::Bool(true)) => Ok(()),
            Some(additional @ Value::Object(_)) => {
                for (property, value) in undeclared {
                    self.match_at_depth(
                        &format!("{}.{}", name, property),
                        additional,
                        value,
                        depth + 1,
                    )?;
                }
                Ok(())
            }
            _ => Err(WaspError::NotMatched(format!(
                "The properties [{}] are not declared in '{}'",
                undeclared
                    .iter()
                    .map(|(property, _)| format!("'{}'", property))
                    .collect::<Vec<_>>()
                    .join(", "),
                name
            ))),
        }
    }

    fn match_array(&self, name: &str, schema: &Value, body: &Value, depth: usize) -> Result<()> {
        let Some(items) = schema.get("items") else {
            return Err(WaspError::InvalidDefinition(format!(
                "Array schema for '{}' declares no items",
                name
            )));
        };

        let Some(elements) = body.as_array() else {
            return Err(WaspError::NotMatched(format!(
                "Expected '{}' to be an array, found '{}'",
                name, body
            )));
        };

        for (index, element) in elements.iter().enumerate() {
            self.match_at_depth(&format!("{}[{}]", name, index), items, element, depth + 1)?;
        }

        Ok(())
    }
}

fn match_integer(name: &str, body: &Value) -> Result<()> {
    match body {
        Value::Number(number) if number.is_i64() || number.is_u64() => Ok(()),
        Value::String(text) if text.parse::<i64>().is_ok() => Ok(()),
        _ => Err(WaspError::NotMatched(format!(
            "Expected '{}' to be an integer, found '{}'",
            name, body
        ))),
    }
}

fn match_number(name: &str, body: &Value) -> Result<()> {
    match body {
        Value::Number(_) => Ok(()),
        Value::String(text) if text.parse::<f64>().is_ok() => Ok(()),
        _ => Err(WaspError::NotMatched(format!(
            "Expected '{}' to be numeric, found '{}'",
            name, body
        ))),
    }
}

fn match_string(name: &str, schema: &Value, body: &Value) -> Result<()> {
    let Some(text) = body.as_str() else {
        return Err(WaspError::NotMatched(format!(
            "Expected '{}' to be a string, found '{}'",
            name, body
        )));
    };

    if let Some(allowed) = schema.get("enum") {
        let allowed = node::as_array(allowed, name)?;
        if !allowed.iter().any(|entry| entry.as_str() == Some(text)) {
            return Err(WaspError::NotMatched(format!(
                "Value '{}' in '{}' not found in enum",
                text, name
            )));
        }
    }

    Ok(())
}

fn match_boolean(name: &str, body: &Value) -> Result<()> {
    if body.is_boolean() {
        return Ok(());
    }

    Err(WaspError::NotMatched(format!(
        "Expected '{}' to be a boolean, found '{}'",
        name, body
    )))
}
