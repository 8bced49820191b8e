//! # Media fault classification
//!
//! Media backends report failures as small integer codes (the four standard
//! media error categories). [`classify`] turns them into a typed
//! [`MediaFault`] with a stable kind and a message fit for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a playback fault. Every kind is recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// Fetching was aborted by the backend.
    Aborted,
    /// A network error stopped fetching.
    NetworkFailure,
    /// The media could not be decoded.
    DecodeFailure,
    /// The source is missing or in a format the backend cannot play.
    SourceUnsupported,
    /// A play-intent was refused.
    PlaybackRejected,
    /// Anything else, including unknown codes.
    Unknown,
}

impl FaultKind {
    /// Stable identifier used in events and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultKind::Aborted => "MEDIA_ERR_ABORTED",
            FaultKind::NetworkFailure => "MEDIA_ERR_NETWORK",
            FaultKind::DecodeFailure => "MEDIA_ERR_DECODE",
            FaultKind::SourceUnsupported => "MEDIA_ERR_SRC_NOT_SUPPORTED",
            FaultKind::PlaybackRejected => "PLAYBACK_REJECTED",
            FaultKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, recoverable playback error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaFault {
    pub kind: FaultKind,
    pub message: String,
}

impl MediaFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Fault for a play-intent the backend refused.
    pub fn playback_rejected(reason: impl fmt::Display) -> Self {
        Self::new(
            FaultKind::PlaybackRejected,
            format!("Playback failed: {}", reason),
        )
    }

    /// Fault for a resource the backend refused to attach at all.
    pub fn attach_failed(reason: impl fmt::Display) -> Self {
        Self::new(
            FaultKind::SourceUnsupported,
            format!("Failed to attach media resource: {}", reason),
        )
    }
}

impl fmt::Display for MediaFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Map a backend fault code to a [`MediaFault`].
///
/// Total and deterministic: `None` and unrecognised codes become
/// [`FaultKind::Unknown`], with the raw code kept in the message.
pub fn classify(raw_code: Option<u16>) -> MediaFault {
    let Some(code) = raw_code else {
        return MediaFault::new(FaultKind::Unknown, "Unknown audio error");
    };

    match code {
        1 => MediaFault::new(
            FaultKind::Aborted,
            "MEDIA_ERR_ABORTED: The fetching process was aborted by the user agent.",
        ),
        2 => MediaFault::new(
            FaultKind::NetworkFailure,
            "MEDIA_ERR_NETWORK: A network error caused the user agent to stop fetching.",
        ),
        3 => MediaFault::new(
            FaultKind::DecodeFailure,
            "MEDIA_ERR_DECODE: An error occurred while decoding the media.",
        ),
        4 => MediaFault::new(
            FaultKind::SourceUnsupported,
            "MEDIA_ERR_SRC_NOT_SUPPORTED: The media resource indicated by the src was not suitable.",
        ),
        other => MediaFault::new(
            FaultKind::Unknown,
            format!("Unknown MediaError code: {}", other),
        ),
    }
}
