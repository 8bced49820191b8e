//! Workspace façade crate.
//!
//! Re-exports the player crates behind feature flags so a host can depend on
//! `folio-audio-workspace` alone. `service` (default) exposes the
//! [`PlayerService`](core_service::PlayerService) façade; `playback` exposes
//! only the engine, playlist and fault types.

#[cfg(feature = "service")]
pub use core_service as service;

#[cfg(any(feature = "service", feature = "playback"))]
pub use core_playback as playback;
