//! # Playback Error Types
//!
//! Errors raised while building the player. Media faults at runtime never
//! surface as `PlaybackError`: the engine absorbs them into its state (see
//! [`MediaFault`](crate::fault::MediaFault)).

use thiserror::Error;

/// Errors that can occur while configuring or constructing playback.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The configured playlist has no tracks.
    #[error("Playlist must contain at least one track")]
    EmptyPlaylist,

    /// A configured track is unusable.
    #[error("Invalid track at position {index}: {reason}")]
    InvalidTrack { index: usize, reason: String },

    /// The start index does not name a track.
    #[error("Start index {index} out of range for a playlist of {len} tracks")]
    StartIndexOutOfRange { index: usize, len: usize },

    /// Player configuration could not be parsed.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PlaybackError {
    /// Returns `true` if this error comes from the configuration content
    /// rather than from reading it.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, PlaybackError::IoError(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
