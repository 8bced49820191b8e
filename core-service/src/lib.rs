//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided media backend and the player
//! configuration into a [`PlaybackEngine`], installs logging when asked to,
//! and exposes the command surface the widget uses together with the
//! callbacks the media binding reports into.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_playback::PlayerConfig;
//! use core_service::PlayerService;
//!
//! let core = CoreConfig::builder()
//!     .media_backend(backend)
//!     .autoplay_on_start(true)
//!     .build()?;
//! let player = PlayerService::new(core, PlayerConfig::portfolio_default())?;
//! player.start().await;
//! render(player.control_surface());
//! ```

pub mod error;
pub mod surface;

pub use error::{CoreError, Result};
pub use surface::{ControlSurfaceView, MuteButton, PlayButton};

use std::sync::Arc;

use bridge_traits::ResourceId;
use core_playback::{EngineState, PlaybackEngine, PlaybackStatus, PlayerConfig};
use core_runtime::config::{CoreConfig, FeatureFlags};
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::init_logging;
use tokio::sync::watch;
use tracing::{debug, info};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct PlayerService {
    engine: Arc<PlaybackEngine>,
    events: Option<EventBus>,
    features: FeatureFlags,
}

impl PlayerService {
    /// Create a service from the runtime and player configuration.
    ///
    /// Installs the global `tracing` subscriber when `core.logging` is set.
    pub fn new(core: CoreConfig, player: PlayerConfig) -> Result<Self> {
        core.validate()?;

        if let Some(logging) = core.logging.clone() {
            init_logging(logging)?;
        }

        let events = core
            .features
            .emit_events
            .then(|| EventBus::new(core.event_buffer_size));

        let mut engine = PlaybackEngine::from_config(&player, core.media_backend.clone())?;
        if let Some(bus) = &events {
            engine = engine.with_event_bus(bus.clone());
        }

        info!(
            tracks = player.tracks.len(),
            start_index = player.start_index,
            muted = player.start_muted,
            "Player service ready"
        );

        Ok(Self {
            engine: Arc::new(engine),
            events,
            features: core.features,
        })
    }

    /// Issue the first play-intent if autoplay is enabled.
    ///
    /// Hosts usually refuse playback before a user gesture; that surfaces
    /// as a `PlaybackRejected` fault the user can recover from by pressing
    /// play.
    pub async fn start(&self) {
        if !self.features.autoplay_on_start {
            debug!("Autoplay disabled");
            return;
        }
        if self.engine.snapshot().status != PlaybackStatus::Idle {
            return;
        }
        self.engine.toggle_playback().await;
    }

    /// Access the playback engine used by the service.
    pub fn engine(&self) -> Arc<PlaybackEngine> {
        Arc::clone(&self.engine)
    }

    pub fn state(&self) -> EngineState {
        self.engine.snapshot()
    }

    pub fn control_surface(&self) -> ControlSurfaceView {
        ControlSurfaceView::from(&self.engine.snapshot())
    }

    /// Receive a new engine snapshot after every transition.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.engine.subscribe()
    }

    /// Subscribe to playback events. `None` when events are disabled.
    pub fn events(&self) -> Option<EventStream> {
        self.events
            .as_ref()
            .map(|bus| EventStream::new(bus.subscribe()))
    }

    // Commands

    pub async fn toggle_playback(&self) {
        self.engine.toggle_playback().await;
    }

    pub fn next(&self) {
        self.engine.next();
    }

    pub fn previous(&self) {
        self.engine.previous();
    }

    pub fn toggle_mute(&self) {
        self.engine.toggle_mute();
    }

    pub fn select_track(&self, index: usize) {
        self.engine.select_track(index);
    }

    // Binding callbacks

    pub async fn on_resource_playable(&self, resource: ResourceId) {
        self.engine.on_resource_playable(resource).await;
    }

    pub fn on_resource_fault(&self, resource: ResourceId, code: Option<u16>) {
        self.engine.on_resource_fault(resource, code);
    }

    pub fn on_track_ended(&self, resource: ResourceId) {
        self.engine.on_track_ended(resource);
    }
}
