use thiserror::Error;

/// Errors that can occur during the graph compilation phase.
///
/// Only structural failures surface here. Missing config fields, dangling
/// edges and unparseable schema lines resolve to defaults instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Invalid canvas state: {0}")]
    InvalidGraph(String),
}

/// Errors that can occur when exporting or importing a graph document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Failed to parse graph document JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to serialize to JSON: {0}")]
    SerializeError(String),

    #[error("Graph document must include nodes and edges arrays (missing: {missing})")]
    MissingArrays { missing: String },

    #[error("Could not access file '{path}': {message}")]
    Io { path: String, message: String },
}

/// Errors that can occur when converting a custom user format into a `CanvasSnapshot`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

impl From<CanvasConversionError> for CompileError {
    fn from(err: CanvasConversionError) -> Self {
        CompileError::InvalidGraph(err.to_string())
    }
}
