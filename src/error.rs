use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaspError {
    #[error("Failed to parse specification: {0}")]
    SchemaParse(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("HTTP method not found: {0}")]
    HttpMethodNotFound(String),

    #[error("Definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Body not matched: {0}")]
    NotMatched(String),

    #[error("Reference cycle: {0}")]
    ReferenceCycle(String),
}

pub type Result<T> = std::result::Result<T, WaspError>;
