//! Playback errors.

use mimic_pose_core::{IngestError, SolveError};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackError {
    /// A transport command needs a loaded sequence.
    #[error("No pose data loaded")]
    NoData,

    /// A load finished after a newer one had started.
    #[error("Load {ticket} superseded by load {current}")]
    StaleLoad { ticket: u64, current: u64 },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    /// The host failed to fetch the data (file read, network, ...).
    #[error("Error loading pose data: {reason}")]
    Source { reason: String },
}

impl PlaybackError {
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::StaleLoad { .. } => "stale",
            Self::Ingest(err) => err.category(),
            Self::Solve(err) => err.category(),
            Self::Source { .. } => "source",
        }
    }
}
