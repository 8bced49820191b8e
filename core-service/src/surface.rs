//! Render model for the player widget.
//!
//! The widget only needs two signals from the engine: the playback status
//! (for its buttons and visualizer) and the current track (for the marquee).

use core_playback::{EngineState, PlaybackStatus};
use serde::{Deserialize, Serialize};

/// What the play/pause button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayButton {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MuteButton {
    Muted,
    Unmuted,
}

/// Everything the widget renders, derived from one engine snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSurfaceView {
    pub play_button: PlayButton,
    pub mute_button: MuteButton,
    /// `title — artist` of the current track.
    pub marquee: String,
    /// The animated bars run only while audio is playing.
    pub visualizer_active: bool,
    /// Fault indicator, present only while errored.
    pub fault_message: Option<String>,
}

impl From<&EngineState> for ControlSurfaceView {
    fn from(state: &EngineState) -> Self {
        let playing = state.status == PlaybackStatus::Playing;
        Self {
            play_button: if playing {
                PlayButton::Pause
            } else {
                PlayButton::Play
            },
            mute_button: if state.muted {
                MuteButton::Muted
            } else {
                MuteButton::Unmuted
            },
            marquee: state.track.display_label(),
            visualizer_active: playing,
            fault_message: match state.status {
                PlaybackStatus::Errored => state.fault.as_ref().map(|f| f.message.clone()),
                _ => None,
            },
        }
    }
}
