//! # Player Configuration
//!
//! The fixed track list and startup settings of the player. Loaded once at
//! startup and never reloaded.

use crate::error::{PlaybackError, Result};
use crate::playlist::{Playlist, Track};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Player configuration.
///
/// ```
/// use core_playback::config::PlayerConfig;
///
/// let config = PlayerConfig::from_json_str(
///     r#"{ "tracks": [{ "title": "saturn", "artist": "SZA", "src": "/saturn_best.mp3" }] }"#,
/// )
/// .unwrap();
/// assert_eq!(config.start_index, 0);
/// assert!(!config.start_muted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Ordered playlist. Must not be empty.
    pub tracks: Vec<Track>,

    /// Initial mute state.
    ///
    /// Default: false.
    #[serde(default = "default_start_muted")]
    pub start_muted: bool,

    /// Track selected when the player is created.
    ///
    /// Default: 0.
    #[serde(default = "default_start_index")]
    pub start_index: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::portfolio_default()
    }
}

impl PlayerConfig {
    /// The three tracks shipped with the portfolio site.
    pub fn portfolio_default() -> Self {
        Self {
            tracks: vec![
                Track::new("Midnight City", "M83", "/montagem-alquimia-ultra-slowed.mp3"),
                Track::new(
                    "montagem alquimia",
                    "h6itam",
                    "/montagem-alquimia-ultra-slowed.mp3",
                ),
                Track::new("saturn", "SZA", "/saturn_best.mp3"),
            ],
            start_muted: default_start_muted(),
            start_index: default_start_index(),
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        for (index, track) in self.tracks.iter().enumerate() {
            if track.source_uri.trim().is_empty() {
                return Err(PlaybackError::InvalidTrack {
                    index,
                    reason: "source locator is empty".to_string(),
                });
            }
            if track.title.trim().is_empty() {
                return Err(PlaybackError::InvalidTrack {
                    index,
                    reason: "title is empty".to_string(),
                });
            }
        }

        if self.start_index >= self.tracks.len() {
            return Err(PlaybackError::StartIndexOutOfRange {
                index: self.start_index,
                len: self.tracks.len(),
            });
        }

        Ok(())
    }

    /// Validate and build the playlist.
    pub fn playlist(&self) -> Result<Playlist> {
        self.validate()?;
        Playlist::new(self.tracks.clone())
    }
}

fn default_start_muted() -> bool {
    false
}

fn default_start_index() -> usize {
    0
}
