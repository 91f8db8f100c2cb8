use crate::error::{Result, WaspError};
use crate::schema::document::{SpecDocument, SpecVersion};
use crate::schema::node;
use regex::Regex;
use serde_json::Value;

/// Maps a concrete request path and method to the operation declared for it.
///
/// Direct lookup is tried first; declared path templates such as
/// `/pet/{petId}` are only consulted when no literal path matches. Templates
/// are tested in declaration order and the first match wins.
pub struct PathResolver<'a> {
    document: &'a SpecDocument,
}

impl<'a> PathResolver<'a> {
    pub fn new(document: &'a SpecDocument) -> Self {
        Self { document }
    }

    pub fn resolve(&self, path: &str, method: &str) -> Result<&'a Value> {
        let method = method.to_lowercase();

        let base_path = self.document.base_path();
        let path = path.strip_prefix(base_path.as_str()).unwrap_or(path);

        let paths = match self.document.root().get("paths") {
            Some(paths) => node::as_object(paths, "paths")?,
            None => return Err(WaspError::PathNotFound(format!("Path '{}' not found", path))),
        };

        if let Some(path_item) = paths.get(path) {
            return match path_item.get(method.as_str()) {
                Some(operation) => Ok(operation),
                None => Err(WaspError::HttpMethodNotFound(format!(
                    "The http method '{}' not found in '{}'",
                    method, path
                ))),
            };
        }

        for (template, path_item) in paths {
            if !template.contains('{') {
                continue;
            }

            let pattern = template_pattern(template)?;
            if let Some(captures) = pattern.captures(path) {
                let operation = path_item.get(method.as_str()).ok_or_else(|| {
                    WaspError::HttpMethodNotFound(format!(
                        "The http method '{}' not found in '{}'",
                        method, path
                    ))
                })?;

                tracing::debug!(%template, path, "request path matched declared template");

                if let Some(parameters) = operation.get("parameters") {
                    self.validate_arguments("path", parameters, &captures)?;
                }

                return Ok(operation);
            }
        }

        Err(WaspError::PathNotFound(format!("Path '{}' not found", path)))
    }

    /// Check captured path arguments against the declared parameter types.
    ///
    /// Only `integer` parameters are checked; every other declared type
    /// already matches the `[^/]+` capture.
    fn validate_arguments(
        &self,
        location: &str,
        parameters: &Value,
        captures: &regex::Captures<'_>,
    ) -> Result<()> {
        let parameters = node::as_array(parameters, "parameters")?;

        for parameter in parameters {
            if parameter.get("in").and_then(Value::as_str) != Some(location) {
                continue;
            }

            let declared_type = match self.document.version() {
                SpecVersion::V2 => parameter.get("type"),
                SpecVersion::V3 => parameter.pointer("/schema/type"),
            }
            .and_then(Value::as_str);

            if declared_type != Some("integer") {
                continue;
            }

            let name = parameter.get("name").and_then(Value::as_str).unwrap_or("");
            if let Some(argument) = captures.name(name)
                && argument.as_str().parse::<i64>().is_err()
            {
                return Err(WaspError::NotMatched(
                    "Path expected an integer value".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Compile a declared path template into an anchored pattern with one named
/// capture per `{name}` placeholder. Captures never cross a `/` boundary.
fn template_pattern(template: &str) -> Result<Regex> {
    let placeholder = Regex::new(r"\\\{([^/{}]+)\\\}").unwrap();

    let pattern = format!(
        "^{}$",
        placeholder.replace_all(&regex::escape(template), "(?P<$1>[^/]+)")
    );

    Regex::new(&pattern).map_err(|e| {
        WaspError::InvalidDefinition(format!(
            "Path template '{}' is not a valid pattern: {}",
            template, e
        ))
    })
}
