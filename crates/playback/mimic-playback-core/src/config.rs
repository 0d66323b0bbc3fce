//! Player configuration.

use serde::{Deserialize, Serialize};

/// When rig frames are produced from landmark frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolvePolicy {
    /// Solve every frame at load. The first bad frame rejects the load.
    #[default]
    Eager,
    /// Solve a frame the first time it is applied and cache the result.
    /// Bad frames surface as `FrameSkipped` events during playback.
    OnDemand,
}

/// Configuration passed to a player at construction. Missing fields in
/// serialized form take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Log every advanced frame at `debug` level.
    pub debug: bool,
    pub solve_policy: SolvePolicy,
    /// Skip medium writes while the medium reports it is not ready.
    pub require_media_ready: bool,
    /// Events retained between drains; the oldest are dropped first.
    pub max_events: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            debug: false,
            solve_policy: SolvePolicy::Eager,
            require_media_ready: true,
            max_events: 1024,
        }
    }
}
