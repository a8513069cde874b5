//! Error types for playback management

use cadence_core::CadenceError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playback order is not a permutation of the track indices
    #[error("Invalid playback order: {0}")]
    InvalidPlaybackOrder(String),

    /// Error raised by a collaborator port (storage, track factory)
    #[error(transparent)]
    Core(#[from] CadenceError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
