//! Mimic Playback Core (engine-agnostic)
//!
//! Frame-accurate playback of a solved pose sequence:
//! - `transport` / `clock`: Stopped / Paused / Playing, fixed-interval pacing
//!   from a host clock without drift, seamless looping.
//! - `player`: [`PosePlayer`] ties ingestion, solving, rig application and
//!   media sync together behind the five transport commands plus `tick`.
//! - `loader`: generation tickets so only the newest load can commit.
//!
//! Hosts call [`PosePlayer::tick`] once per render cycle with a millisecond
//! timestamp and drain [`PlaybackEvent`]s afterwards.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod loader;
pub mod media;
pub mod player;
pub mod state;
pub mod transport;

pub use clock::FrameClock;
pub use config::{PlaybackConfig, SolvePolicy};
pub use error::PlaybackError;
pub use events::{EventBuffer, PlaybackEvent};
pub use loader::{LoadTicket, LoadTracker};
pub use media::{ManualMedium, TimeMedium};
pub use player::{
    LoadSource, MediumHandle, PosePlayer, SkeletonHandle, STATUS_LOADED, STATUS_LOAD_FAILED,
    STATUS_NO_DATA, STATUS_SOLVE_FAILED,
};
pub use state::{PlaybackState, TransportState};
pub use transport::Transport;

// Re-exports so hosts need a single dependency.
pub use mimic_pose_core::{
    IngestError, InputFormat, Landmark, Landmark2D, PoseSolver, SequenceSummary, SolveError,
};
pub use mimic_rig_core::{HumanoidSkeleton, MemorySkeleton, RigFrame};
