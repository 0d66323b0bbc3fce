//! Transport state and the read-only snapshot handed to hosts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// Like `Paused`, but the frame index is held at 0.
    Stopped,
    #[default]
    Paused,
    Playing,
}

impl TransportState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Paused => "paused",
            Self::Playing => "playing",
        }
    }

    #[inline]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of playback at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub state: TransportState,
    pub is_playing: bool,
    /// In `[0, frame_count - 1]`; 0 when nothing is loaded.
    pub current_frame_index: usize,
    pub frame_count: usize,
    /// 0 when nothing is loaded.
    pub fps: f64,
    /// Tick anchor; `None` unless playing.
    pub last_tick_ms: Option<f64>,
}
