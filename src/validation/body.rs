use crate::error::{Result, WaspError};
use crate::schema::document::{SpecDocument, SpecVersion};
use crate::schema::node;
use crate::validation::matcher::SchemaMatcher;
use serde_json::Value;

/// Matches request bodies against the schema declared for an operation.
///
/// OpenAPI 3 declares the body under `requestBody`, Swagger 2 as a parameter
/// with `in: body`; both funnel into the same matcher.
pub struct RequestBody<'a> {
    document: &'a SpecDocument,
    name: String,
    structure: Option<&'a Value>,
}

impl<'a> RequestBody<'a> {
    pub(crate) fn new(document: &'a SpecDocument, name: String, structure: Option<&'a Value>) -> Self {
        Self {
            document,
            name,
            structure,
        }
    }

    pub fn match_body(&self, body: &Value) -> Result<()> {
        match self.document.version() {
            SpecVersion::V3 => {
                let Some(structure) = self.structure else {
                    return require_empty(&self.name, body);
                };

                // The whole requestBody may be a component reference.
                let resolved;
                let structure = if let Some(reference) =
                    structure.get("$ref").and_then(Value::as_str)
                {
                    resolved = self.document.resolve_definition(reference)?;
                    &resolved
                } else {
                    structure
                };

                match_content(self.document, &self.name, structure, body)
            }
            SpecVersion::V2 => {
                let Some(parameters) = self.structure else {
                    return require_empty(&self.name, body);
                };
                let parameters = node::as_array(parameters, "parameters")?;

                for parameter in parameters {
                    if parameter.get("in").and_then(Value::as_str) == Some("body")
                        && let Some(schema) = parameter.get("schema")
                    {
                        return SchemaMatcher::new(self.document).match_value(&self.name, schema, body);
                    }
                }

                require_empty(&self.name, body)
            }
        }
    }
}

/// Matches response bodies against the declaration for one status code.
pub struct ResponseBody<'a> {
    document: &'a SpecDocument,
    name: String,
    structure: &'a Value,
}

impl<'a> ResponseBody<'a> {
    pub(crate) fn new(document: &'a SpecDocument, name: String, structure: &'a Value) -> Self {
        Self {
            document,
            name,
            structure,
        }
    }

    pub fn match_body(&self, body: &Value) -> Result<()> {
        // Responses may be declared as a shared component reference.
        let resolved;
        let structure = if let Some(reference) = self.structure.get("$ref").and_then(Value::as_str)
        {
            resolved = self.document.resolve_definition(reference)?;
            &resolved
        } else {
            self.structure
        };

        match self.document.version() {
            SpecVersion::V3 => match_content(self.document, &self.name, structure, body),
            SpecVersion::V2 => match structure.get("schema") {
                Some(schema) => SchemaMatcher::new(self.document).match_value(&self.name, schema, body),
                None => require_empty(&self.name, body),
            },
        }
    }
}

/// Apply the OpenAPI 3 `content` selection rule: an explicitly empty mapping
/// accepts any body, an absent mapping demands an empty body, and otherwise
/// the first declared media type's schema is used. No negotiation against
/// actual headers takes place.
fn match_content(document: &SpecDocument, name: &str, structure: &Value, body: &Value) -> Result<()> {
    let Some(content) = structure.get("content") else {
        return require_empty(name, body);
    };
    let content = node::as_object(content, "content")?;

    let Some((media_type, entry)) = content.iter().next() else {
        return Ok(());
    };

    tracing::debug!(%media_type, name, "selected first declared media type");

    let schema = entry.get("schema").ok_or_else(|| {
        WaspError::InvalidDefinition(format!(
            "Media type '{}' in '{}' declares no schema",
            media_type, name
        ))
    })?;

    SchemaMatcher::new(document).match_value(name, schema, body)
}

fn require_empty(name: &str, body: &Value) -> Result<()> {
    let empty = match body {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    };

    if empty {
        return Ok(());
    }

    Err(WaspError::NotMatched(format!(
        "Expected empty body for {}",
        name
    )))
}
