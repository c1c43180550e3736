use thiserror::Error;
use tsunagi_core::MappingError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("mapping document {0} has no usable entries")]
    EmptyMapping(String),
}
