use crate::error::{Result, WaspError};
use crate::loader;
use crate::schema::definition::DefinitionResolver;
use crate::schema::path::PathResolver;
use crate::validation::{RequestBody, ResponseBody};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Major dialect of a specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// Swagger 2.0, marked by a top-level `swagger` key.
    V2,
    /// OpenAPI 3.x, assumed whenever the `swagger` key is absent.
    V3,
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::V2 => write!(f, "2"),
            SpecVersion::V3 => write!(f, "3"),
        }
    }
}

/// A parsed OpenAPI/Swagger contract.
///
/// The document tree is read-only after construction; the only mutable state
/// is the `allow_null_values` leniency flag, which Swagger 2.0 needs because
/// that dialect has no `nullable` keyword. Validation entry points all borrow
/// the document immutably, so a `SpecDocument` can be shared across
/// concurrent validations once the flag is set.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    root: Value,
    version: SpecVersion,
    allow_null_values: bool,
}

impl SpecDocument {
    /// Build a document from raw JSON or YAML text.
    pub fn new(text: &str, allow_null_values: bool) -> Result<Self> {
        let root = loader::parse_spec(text)?;
        let version = if root.get("swagger").is_some() {
            SpecVersion::V2
        } else {
            SpecVersion::V3
        };

        Ok(Self {
            root,
            version,
            allow_null_values,
        })
    }

    /// Build a document from a specification file.
    pub fn from_file<P: AsRef<Path>>(path: P, allow_null_values: bool) -> Result<Self> {
        let root = loader::load_spec(path)?;
        let version = if root.get("swagger").is_some() {
            SpecVersion::V2
        } else {
            SpecVersion::V3
        };

        Ok(Self {
            root,
            version,
            allow_null_values,
        })
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    /// First declared server URL (OpenAPI 3), or `""` when absent.
    pub fn server_url(&self) -> &str {
        self.root
            .pointer("/servers/0/url")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// First declared scheme (Swagger 2), or `""` when absent.
    pub fn http_scheme(&self) -> &str {
        self.root
            .pointer("/schemes/0")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Declared host (Swagger 2), or `""` when absent.
    pub fn host(&self) -> &str {
        self.root.get("host").and_then(Value::as_str).unwrap_or("")
    }

    /// Path prefix stripped from incoming request paths.
    ///
    /// Swagger 2 declares this literally as `basePath`. OpenAPI 3 has no such
    /// field, so the last path segment of the first server URL is taken and
    /// prefixed with `/` instead.
    pub fn base_path(&self) -> String {
        match self.version {
            SpecVersion::V2 => self
                .root
                .get("basePath")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            SpecVersion::V3 => {
                let url = self.server_url();
                if url.is_empty() {
                    return String::new();
                }
                match url.rsplit('/').next() {
                    Some(segment) => format!("/{}", segment),
                    None => String::new(),
                }
            }
        }
    }

    /// Swagger 2.0 cannot express null values, so this flag decides whether a
    /// null property still matches its schema.
    pub fn allow_null_values(&self) -> bool {
        self.allow_null_values
    }

    pub fn set_allow_null_values(&mut self, value: bool) {
        self.allow_null_values = value;
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve `(path, method)` to the operation declared for it.
    pub fn resolve_operation(&self, path: &str, method: &str) -> Result<&Value> {
        PathResolver::new(self).resolve(path, method)
    }

    /// Resolve a `#/...` pointer to the schema node it addresses.
    pub fn resolve_definition(&self, pointer: &str) -> Result<Value> {
        DefinitionResolver::new(self).resolve(pointer)
    }

    /// Select the request body declaration for an operation.
    pub fn request_body(&self, path: &str, method: &str) -> Result<RequestBody<'_>> {
        let operation = self.resolve_operation(path, method)?;
        let name = format!("{} {}", method.to_uppercase(), path);

        let structure = match self.version {
            SpecVersion::V2 => operation.get("parameters"),
            SpecVersion::V3 => operation.get("requestBody"),
        };

        Ok(RequestBody::new(self, name, structure))
    }

    /// Select the response declaration for an operation and status code.
    pub fn response_body(&self, path: &str, method: &str, status: &str) -> Result<ResponseBody<'_>> {
        let operation = self.resolve_operation(path, method)?;

        let response = operation
            .get("responses")
            .and_then(|responses| responses.get(status))
            .ok_or_else(|| {
                WaspError::InvalidDefinition(format!(
                    "Could not find status code '{}' in '{}' and '{}'",
                    status, path, method
                ))
            })?;

        let name = format!("{} {} {}", method.to_uppercase(), status, path);
        Ok(ResponseBody::new(self, name, response))
    }
}
