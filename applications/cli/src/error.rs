/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Nothing is playing")]
    NothingPlaying,

    #[error(transparent)]
    Core(#[from] cadence_core::CadenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cadence_storage::StorageError> for CliError {
    fn from(err: cadence_storage::StorageError) -> Self {
        // Convert StorageError -> CadenceError -> CliError
        CliError::Core(err.into())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
