//! Error types for playlist playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// No tracks are loaded
    #[error("Queue is empty")]
    EmptyQueue,

    /// Index outside the queue bounds
    #[error("Index out of range: {index} (queue length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Two tracks in one list share an id
    #[error("Duplicate track id: {0}")]
    DuplicateTrackId(String),

    /// The device refused to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
