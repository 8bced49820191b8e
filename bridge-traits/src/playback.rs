//! Media resource bridge trait and supporting types.
//!
//! The playback engine never touches a media element directly. Hosts provide a
//! [`MediaBackend`] that attaches one playable resource per track, and report
//! the resource's asynchronous events (playable, fault, ended) back to the
//! engine tagged with the [`ResourceId`] they were registered for.
//!
//! Everything except [`MediaBackend::play`] is synchronous: stopping and
//! detaching a resource must complete before the engine attaches the next one.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Location of the media behind a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaSource {
    /// File or site-relative asset served by the host (e.g. `/saturn_best.mp3`).
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) resource.
    Remote { url: String },
}

impl MediaSource {
    /// Interpret a configured source locator.
    ///
    /// `http://` and `https://` locators are remote; everything else is
    /// treated as a host-local path.
    pub fn from_locator(locator: &str) -> Self {
        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            MediaSource::Remote {
                url: locator.to_string(),
            }
        } else {
            MediaSource::LocalFile {
                path: PathBuf::from(locator),
            }
        }
    }

    /// Determine whether the source requires network access.
    pub fn is_remote(&self) -> bool {
        matches!(self, MediaSource::Remote { .. })
    }

    /// The locator string this source was built from.
    pub fn locator(&self) -> String {
        match self {
            MediaSource::LocalFile { path } => path.display().to_string(),
            MediaSource::Remote { url } => url.clone(),
        }
    }
}

/// Display metadata handed to the backend alongside a resource, for hosts that
/// surface it in a media session or notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Request describing the resource the backend should attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Media to load.
    pub source: MediaSource,
    /// Initial mute state; the engine keeps mute across track changes.
    pub muted: bool,
    /// Optional metadata surfaced to the host.
    pub metadata: ResourceMetadata,
}

impl ResourceRequest {
    /// Construct an unmuted request for the given source.
    pub fn new(source: MediaSource) -> Self {
        Self {
            source,
            muted: false,
            metadata: ResourceMetadata::default(),
        }
    }

    /// Set the initial mute state.
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Attach display metadata.
    pub fn with_metadata(mut self, metadata: ResourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Identifier of one attached media resource.
///
/// A fresh id is minted for every attach, so events from a resource that has
/// since been released can be told apart from events of its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct an identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for platform-specific media backends (an HTML audio element, a
/// native player, a test double).
///
/// Implementations must start loading immediately on [`attach`](Self::attach)
/// and later report readiness, faults, and natural completion to the engine.
///
/// The engine calls every method except [`play`](Self::play) while holding
/// its state lock. Readiness, fault and completion callbacks must therefore
/// be delivered from a later task or event-loop turn, never from inside a
/// `MediaBackend` method.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait MediaBackend: PlatformSendSync {
    /// Attach a new resource and begin loading it.
    fn attach(&self, request: ResourceRequest) -> Result<ResourceId>;

    /// Issue a play-intent. Resolves once the backend has actually started
    /// output, or fails with [`BridgeError::Rejected`](crate::BridgeError::Rejected).
    async fn play(&self, resource: ResourceId) -> Result<()>;

    /// Pause output, keeping position and the loaded source.
    fn pause(&self, resource: ResourceId) -> Result<()>;

    /// Pause output and rewind to the start.
    fn stop(&self, resource: ResourceId) -> Result<()>;

    /// Detach the resource and drop its buffered media.
    fn release(&self, resource: ResourceId) -> Result<()>;

    /// Mute or unmute output.
    fn set_muted(&self, resource: ResourceId, muted: bool) -> Result<()>;
}
