//! # Tracks and the fixed playlist
//!
//! The playlist is built once at startup and never changes afterwards. All
//! navigation is cyclic: stepping past the last track lands on the first and
//! vice versa, so an index produced here is always in range.

use crate::error::{PlaybackError, Result};
use bridge_traits::{MediaSource, ResourceMetadata, ResourceRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One playable entry of the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Locator of the media (site-relative path or URL).
    #[serde(alias = "src")]
    pub source_uri: String,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            source_uri: source_uri.into(),
        }
    }

    /// Text shown in the widget's marquee, e.g. `saturn — SZA`.
    pub fn display_label(&self) -> String {
        format!("{} — {}", self.title, self.artist)
    }

    pub fn source(&self) -> MediaSource {
        MediaSource::from_locator(&self.source_uri)
    }

    /// Build the attach request the media backend receives for this track.
    pub(crate) fn resource_request(&self, muted: bool) -> ResourceRequest {
        ResourceRequest::new(self.source())
            .with_muted(muted)
            .with_metadata(ResourceMetadata {
                title: Some(self.title.clone()),
                artist: Some(self.artist.clone()),
            })
    }
}

/// Immutable, non-empty, ordered sequence of tracks.
///
/// Cloning is cheap; clones share the same track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Arc<[Track]>,
}

impl Playlist {
    /// Create a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::EmptyPlaylist`] if `tracks` is empty.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(Self {
            tracks: tracks.into(),
        })
    }

    /// Number of tracks (always ≥ 1).
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`. Callers keep `index < len()` by using
    /// [`wrap`](Self::wrap), [`next`](Self::next) and [`previous`](Self::previous).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn track_at(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    /// Reduce any index into range.
    pub fn wrap(&self, index: usize) -> usize {
        index % self.len()
    }

    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    pub fn previous(&self, index: usize) -> usize {
        (index + self.len() - 1) % self.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}
