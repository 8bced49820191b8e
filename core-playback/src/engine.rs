//! # Playback Engine
//!
//! Owns the single media resource, the playback state machine and the command
//! surface.
//!
//! ## State machine
//!
//! ```text
//! Idle    --select_track--> Loading
//! Loading --playable, intent on--> Playing
//! Loading --playable, intent off--> Paused
//! Playing --toggle--> Paused
//! Paused  --toggle--> Playing (async, may fail -> Errored)
//! Playing/Paused/Errored --select_track/next/previous--> Loading
//! Playing --track ended--> Loading (next track)
//! any     --fault--> Errored
//! ```
//!
//! ## Resource ownership
//!
//! At most one resource is attached at any time. Switching tracks stops and
//! releases the old resource before the new one is attached, all while the
//! engine lock is held. Every attach bumps the [`Generation`]; a play-intent
//! carries a [`PlayTicket`] so a result that arrives after the track changed
//! is dropped instead of reviving a resource that is no longer current.
//!
//! ## Locking
//!
//! State lives behind a `parking_lot::Mutex` that is never held across an
//! `.await`. The only suspension point is [`MediaBackend::play`].

use crate::config::PlayerConfig;
use crate::error::Result;
use crate::fault::{classify, MediaFault};
use crate::playlist::{Playlist, Track};
use bridge_traits::error::BridgeError;
use bridge_traits::{MediaBackend, ResourceId};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use core_runtime::logging::strip_path;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Playback status. Exactly one value at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing attached yet.
    #[default]
    Idle,
    /// A resource is attached and has not reported playable.
    Loading,
    Playing,
    Paused,
    /// A fault occurred; the resource was silenced and released.
    Errored,
}

impl PlaybackStatus {
    /// Check if audio may currently be audible.
    pub fn is_audible(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }

    /// Check if a resource is attached in this status.
    pub fn has_resource(&self) -> bool {
        matches!(
            self,
            PlaybackStatus::Loading | PlaybackStatus::Playing | PlaybackStatus::Paused
        )
    }
}

/// Tag of one attach. Bumped every time a resource is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Identifies one outstanding play-intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlayTicket {
    generation: Generation,
    seq: u64,
}

/// Read-only snapshot of the engine, published on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub current_index: usize,
    pub status: PlaybackStatus,
    pub muted: bool,
    /// Set exactly while `status` is [`PlaybackStatus::Errored`].
    pub fault: Option<MediaFault>,
    /// Metadata of the track at `current_index`.
    pub track: Track,
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    resource: ResourceId,
    generation: Generation,
    playable: bool,
}

#[derive(Debug)]
struct EngineInner {
    current_index: usize,
    status: PlaybackStatus,
    muted: bool,
    fault: Option<MediaFault>,
    play_intent: bool,
    attachment: Option<Attachment>,
    generation: Generation,
    next_seq: u64,
    pending: Option<PlayTicket>,
}

impl EngineInner {
    fn issue_ticket(&mut self, generation: Generation) -> PlayTicket {
        self.next_seq += 1;
        let ticket = PlayTicket {
            generation,
            seq: self.next_seq,
        };
        self.pending = Some(ticket);
        ticket
    }

    /// The attachment, if `resource` is the one currently attached.
    fn current(&self, resource: ResourceId) -> Option<Attachment> {
        self.attachment.filter(|a| a.resource == resource)
    }
}

/// The playback engine.
///
/// Commands (`select_track`, `next`, `previous`, `toggle_playback`,
/// `toggle_mute`) come from the control surface; callbacks
/// (`on_resource_playable`, `on_resource_fault`, `on_track_ended`) come from
/// the media binding and carry the [`ResourceId`] they were registered for.
pub struct PlaybackEngine {
    playlist: Playlist,
    backend: Arc<dyn MediaBackend>,
    inner: Mutex<EngineInner>,
    state_tx: watch::Sender<EngineState>,
    events: Option<EventBus>,
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackEngine")
            .field("playlist", &self.playlist)
            .field("backend", &"MediaBackend { ... }")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}

impl PlaybackEngine {
    /// Create an idle engine positioned on the first track, unmuted.
    pub fn new(playlist: Playlist, backend: Arc<dyn MediaBackend>) -> Self {
        Self::with_initial(playlist, backend, 0, false)
    }

    /// Create an idle engine from a player configuration.
    pub fn from_config(config: &PlayerConfig, backend: Arc<dyn MediaBackend>) -> Result<Self> {
        let playlist = config.playlist()?;
        Ok(Self::with_initial(
            playlist,
            backend,
            config.start_index,
            config.start_muted,
        ))
    }

    fn with_initial(
        playlist: Playlist,
        backend: Arc<dyn MediaBackend>,
        start_index: usize,
        muted: bool,
    ) -> Self {
        let current_index = playlist.wrap(start_index);
        let inner = EngineInner {
            current_index,
            status: PlaybackStatus::Idle,
            muted,
            fault: None,
            play_intent: false,
            attachment: None,
            generation: Generation::default(),
            next_seq: 0,
            pending: None,
        };
        let (state_tx, _) = watch::channel(EngineState {
            current_index,
            status: PlaybackStatus::Idle,
            muted,
            fault: None,
            track: playlist.track_at(current_index).clone(),
        });

        Self {
            playlist,
            backend,
            inner: Mutex::new(inner),
            state_tx,
            events: None,
        }
    }

    /// Also publish coarse [`PlaybackEvent`]s on `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Current state.
    pub fn snapshot(&self) -> EngineState {
        self.state_tx.borrow().clone()
    }

    /// Receive a new snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state_tx.subscribe()
    }

    /// Generation of the currently attached resource, if any.
    pub fn generation(&self) -> Option<Generation> {
        self.inner.lock().attachment.map(|a| a.generation)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Switch to the track at `index` (taken modulo the playlist length).
    ///
    /// Selecting the current track is a no-op while it is loading, playing
    /// or paused, and reloads it while idle or errored.
    #[instrument(skip(self))]
    pub fn select_track(&self, index: usize) {
        let index = self.playlist.wrap(index);
        let mut inner = self.inner.lock();
        if index == inner.current_index && inner.status.has_resource() {
            debug!(track_index = index, status = ?inner.status, "Track already selected");
            return;
        }
        self.load_track(&mut inner, index);
    }

    #[instrument(skip(self))]
    pub fn next(&self) {
        let mut inner = self.inner.lock();
        let index = self.playlist.next(inner.current_index);
        self.load_track(&mut inner, index);
    }

    #[instrument(skip(self))]
    pub fn previous(&self) {
        let mut inner = self.inner.lock();
        let index = self.playlist.previous(inner.current_index);
        self.load_track(&mut inner, index);
    }

    /// Pause when playing, otherwise issue a play-intent.
    #[instrument(skip(self))]
    pub async fn toggle_playback(&self) {
        let Some((ticket, resource)) = self.begin_toggle() else {
            return;
        };
        let result = self.backend.play(resource).await;
        self.resolve_play(ticket, result);
    }

    /// Flip the mute state. Status is unaffected.
    #[instrument(skip(self))]
    pub fn toggle_mute(&self) {
        let mut inner = self.inner.lock();
        inner.muted = !inner.muted;
        let muted = inner.muted;

        if let Some(attachment) = inner.attachment {
            if let Err(e) = self.backend.set_muted(attachment.resource, muted) {
                warn!(error = %e, muted, "Failed to apply mute state");
            }
        }

        debug!(muted, "Mute toggled");
        self.emit(PlaybackEvent::MuteChanged { muted });
        self.publish(&inner);
    }

    // ------------------------------------------------------------------
    // Binding callbacks
    // ------------------------------------------------------------------

    /// The resource can start playing. Settles a loading track, issuing the
    /// play-intent if one is remembered.
    #[instrument(skip(self))]
    pub async fn on_resource_playable(&self, resource: ResourceId) {
        let Some((ticket, resource)) = self.begin_settle(resource) else {
            return;
        };
        let result = self.backend.play(resource).await;
        self.resolve_play(ticket, result);
    }

    /// The resource reported a fault. `code` is the backend's raw fault code.
    #[instrument(skip(self))]
    pub fn on_resource_fault(&self, resource: ResourceId, code: Option<u16>) {
        let mut inner = self.inner.lock();
        if inner.current(resource).is_none() {
            debug!(%resource, "Ignoring fault from detached resource");
            return;
        }
        self.enter_errored(&mut inner, classify(code));
    }

    /// The resource played to its end. Advances to the next track, keeping
    /// the play-intent.
    #[instrument(skip(self))]
    pub fn on_track_ended(&self, resource: ResourceId) {
        let mut inner = self.inner.lock();
        if inner.current(resource).is_none() {
            debug!(%resource, "Ignoring end of detached resource");
            return;
        }

        let finished = inner.current_index;
        self.emit(PlaybackEvent::Completed {
            track_index: finished,
        });
        let index = self.playlist.next(finished);
        debug!(from = finished, to = index, "Auto-advancing");
        self.load_track(&mut inner, index);
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn begin_toggle(&self) -> Option<(PlayTicket, ResourceId)> {
        let mut inner = self.inner.lock();
        match inner.status {
            PlaybackStatus::Playing => {
                inner.play_intent = false;
                self.pause_attached(&inner);
                inner.status = PlaybackStatus::Paused;
                info!(track_index = inner.current_index, "Paused");
                self.emit(PlaybackEvent::Paused {
                    track_index: inner.current_index,
                });
                self.publish(&inner);
                None
            }
            PlaybackStatus::Loading => {
                inner.play_intent = !inner.play_intent;
                if !inner.play_intent && inner.pending.take().is_some() {
                    // Playable with a play in flight: cancel and settle paused.
                    self.pause_attached(&inner);
                    self.settle_paused(&mut inner);
                } else {
                    debug!(play_intent = inner.play_intent, "Play-intent updated while loading");
                }
                None
            }
            PlaybackStatus::Paused => {
                if inner.pending.take().is_some() {
                    inner.play_intent = false;
                    self.pause_attached(&inner);
                    debug!("Cancelled in-flight play-intent");
                    return None;
                }
                inner.play_intent = true;
                let Some(attachment) = inner.attachment else {
                    let index = inner.current_index;
                    self.load_track(&mut inner, index);
                    return None;
                };
                let ticket = inner.issue_ticket(attachment.generation);
                debug!(generation = %ticket.generation, seq = ticket.seq, "Issuing play-intent");
                Some((ticket, attachment.resource))
            }
            PlaybackStatus::Idle | PlaybackStatus::Errored => {
                inner.play_intent = true;
                let index = inner.current_index;
                self.load_track(&mut inner, index);
                None
            }
        }
    }

    fn begin_settle(&self, resource: ResourceId) -> Option<(PlayTicket, ResourceId)> {
        let mut inner = self.inner.lock();
        let Some(attachment) = inner.current(resource) else {
            debug!(%resource, "Ignoring playable from detached resource");
            return None;
        };
        if inner.status != PlaybackStatus::Loading || attachment.playable {
            return None;
        }

        if let Some(current) = inner.attachment.as_mut() {
            current.playable = true;
        }

        if inner.play_intent {
            let ticket = inner.issue_ticket(attachment.generation);
            debug!(generation = %ticket.generation, seq = ticket.seq, "Resource playable, issuing play-intent");
            Some((ticket, attachment.resource))
        } else {
            self.settle_paused(&mut inner);
            None
        }
    }

    /// Apply the outcome of `MediaBackend::play` for `ticket`.
    fn resolve_play(&self, ticket: PlayTicket, result: std::result::Result<(), BridgeError>) {
        let mut inner = self.inner.lock();

        let current_generation = inner.attachment.map(|a| a.generation);
        if current_generation != Some(ticket.generation) {
            debug!(
                generation = %ticket.generation,
                ok = result.is_ok(),
                "Discarding play result from superseded generation"
            );
            return;
        }

        if inner.pending != Some(ticket) {
            // Cancelled on the same resource. Silence a late success unless a
            // newer play-intent is waiting on it.
            if result.is_ok() && inner.pending.is_none() && !inner.status.is_audible() {
                self.pause_attached(&inner);
            }
            debug!(seq = ticket.seq, "Play result for cancelled intent");
            return;
        }
        inner.pending = None;

        match result {
            Ok(()) => {
                inner.status = PlaybackStatus::Playing;
                inner.fault = None;
                let track = self.playlist.track_at(inner.current_index);
                info!(
                    track_index = inner.current_index,
                    generation = %ticket.generation,
                    title = %track.title,
                    "Playing"
                );
                self.emit(PlaybackEvent::Started {
                    track_index: inner.current_index,
                    title: track.title.clone(),
                });
                self.publish(&inner);
            }
            Err(e) => {
                let reason = match e {
                    BridgeError::Rejected(reason) => reason,
                    other => other.to_string(),
                };
                self.enter_errored(&mut inner, MediaFault::playback_rejected(reason));
            }
        }
    }

    /// Detach the current resource and attach `index`.
    fn load_track(&self, inner: &mut MutexGuard<'_, EngineInner>, index: usize) {
        inner.current_index = index;
        inner.fault = None;
        inner.pending = None;
        self.detach(inner);

        inner.generation = inner.generation.next();
        let generation = inner.generation;
        let track = self.playlist.track_at(index);

        match self.backend.attach(track.resource_request(inner.muted)) {
            Ok(resource) => {
                inner.attachment = Some(Attachment {
                    resource,
                    generation,
                    playable: false,
                });
                inner.status = PlaybackStatus::Loading;
                info!(
                    track_index = index,
                    %generation,
                    source = strip_path(&track.source_uri),
                    play_intent = inner.play_intent,
                    "Loading track"
                );
                self.emit(PlaybackEvent::Loading {
                    track_index: index,
                    title: track.title.clone(),
                    artist: track.artist.clone(),
                });
                self.publish(inner);
            }
            Err(e) => self.enter_errored(inner, MediaFault::attach_failed(e)),
        }
    }

    /// Silence and release the resource, then record `fault`.
    fn enter_errored(&self, inner: &mut MutexGuard<'_, EngineInner>, fault: MediaFault) {
        self.detach(inner);
        inner.pending = None;
        inner.play_intent = false;
        inner.status = PlaybackStatus::Errored;

        error!(
            track_index = inner.current_index,
            fault_kind = %fault.kind,
            message = %fault.message,
            "Playback fault"
        );
        self.emit(PlaybackEvent::Error {
            track_index: Some(inner.current_index),
            kind: fault.kind.as_str().to_string(),
            message: fault.message.clone(),
            recoverable: true,
        });

        inner.fault = Some(fault);
        self.publish(inner);
    }

    fn settle_paused(&self, inner: &mut MutexGuard<'_, EngineInner>) {
        inner.status = PlaybackStatus::Paused;
        inner.fault = None;
        debug!(track_index = inner.current_index, "Settled paused");
        self.emit(PlaybackEvent::Paused {
            track_index: inner.current_index,
        });
        self.publish(inner);
    }

    /// Stop (pause + rewind) and release the attached resource, if any.
    fn detach(&self, inner: &mut MutexGuard<'_, EngineInner>) {
        let Some(attachment) = inner.attachment.take() else {
            return;
        };
        if let Err(e) = self.backend.stop(attachment.resource) {
            warn!(error = %e, generation = %attachment.generation, "Failed to stop resource");
        }
        if let Err(e) = self.backend.release(attachment.resource) {
            warn!(error = %e, generation = %attachment.generation, "Failed to release resource");
        }
    }

    fn pause_attached(&self, inner: &EngineInner) {
        if let Some(attachment) = inner.attachment {
            if let Err(e) = self.backend.pause(attachment.resource) {
                warn!(error = %e, generation = %attachment.generation, "Failed to pause resource");
            }
        }
    }

    fn publish(&self, inner: &EngineInner) {
        let state = EngineState {
            current_index: inner.current_index,
            status: inner.status,
            muted: inner.muted,
            fault: inner.fault.clone(),
            track: self.playlist.track_at(inner.current_index).clone(),
        };
        self.state_tx.send_replace(state);
    }

    fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is not an error.
            let _ = bus.emit(CoreEvent::Playback(event));
        }
    }
}
