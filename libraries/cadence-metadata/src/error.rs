/// Metadata-specific errors
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Blocking read task did not complete
    #[error("Read task failed: {0}")]
    TaskFailed(String),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for cadence_core::CadenceError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => cadence_core::CadenceError::not_found("file", path),
            other => cadence_core::CadenceError::metadata(other.to_string()),
        }
    }
}
