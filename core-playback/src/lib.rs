//! # Playback Module
//!
//! Playlist, fault classification and the playback engine of the embedded
//! audio player.
//!
//! ## Overview
//!
//! This module handles:
//! - A fixed, cyclic playlist loaded from [`PlayerConfig`]
//! - Mapping backend fault codes to typed [`MediaFault`]s
//! - The [`PlaybackEngine`] state machine, which owns the single media
//!   resource and guarantees two resources never sound at once
//!
//! The engine talks to the platform only through
//! [`bridge_traits::MediaBackend`].

pub mod config;
pub mod engine;
pub mod error;
pub mod fault;
pub mod playlist;

pub use config::PlayerConfig;
pub use engine::{EngineState, Generation, PlaybackEngine, PlaybackStatus};
pub use error::{PlaybackError, Result};
pub use fault::{classify, FaultKind, MediaFault};
pub use playlist::{Playlist, Track};
