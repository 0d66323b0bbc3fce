//! Error types for ingestion and solving.

use serde::{Deserialize, Serialize};

/// Load-time failures. Any of these rejects the whole load.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum IngestError {
    /// Input is not valid UTF-8 text or not valid JSON.
    #[error("Invalid JSON format: {reason}")]
    Parse { reason: String },

    /// Required pose-sequence fields are missing or malformed.
    #[error("Invalid pose data: {reason}")]
    Schema { reason: String },

    /// The bulk format produced no usable frames.
    #[error("No usable frames ({dropped_frames} dropped)")]
    EmptySequence { dropped_frames: usize },

    /// The byte source could not be read.
    #[error("Error reading pose data: {reason}")]
    Io { reason: String },
}

impl IngestError {
    #[inline]
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Error category for logging/status display.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Schema { .. } => "schema",
            Self::EmptySequence { .. } => "empty",
            Self::Io { .. } => "io",
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

/// Per-frame failures detected while solving.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SolveError {
    /// The frame has no `poseLandmarks` sequence.
    #[error("Invalid poseLandmarks format in frame {frame}")]
    MissingLandmarks { frame: usize },

    /// The frame's landmark sequence is empty.
    #[error("Frame {frame} has no landmarks")]
    EmptyLandmarks { frame: usize },

    /// The external solver rejected the frame.
    #[error("Solver failed on frame {frame}: {reason}")]
    Solver { frame: usize, reason: String },
}

impl SolveError {
    /// Index of the frame that failed.
    #[inline]
    pub fn frame(&self) -> usize {
        match self {
            Self::MissingLandmarks { frame }
            | Self::EmptyLandmarks { frame }
            | Self::Solver { frame, .. } => *frame,
        }
    }

    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingLandmarks { .. } | Self::EmptyLandmarks { .. } => "frame",
            Self::Solver { .. } => "solver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_become_parse_errors() {
        let err: IngestError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), "parse");
    }

    #[test]
    fn solve_error_reports_frame() {
        let err = SolveError::Solver {
            frame: 4,
            reason: "boom".into(),
        };
        assert_eq!(err.frame(), 4);
        assert_eq!(err.to_string(), "Solver failed on frame 4: boom");
    }
}
