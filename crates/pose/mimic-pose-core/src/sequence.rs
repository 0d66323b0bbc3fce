//! Canonical pose-sequence model.

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::IngestError;
use crate::landmark::LandmarkRecord;

/// Frame rate assigned to bulk (array-of-arrays) input.
pub const BULK_FPS: f64 = 30.0;

/// Landmark payload of a frame as ingested.
///
/// Only the first frame of a sequence is checked at load; later frames keep
/// whatever they carried and are rejected when solved.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameLandmarks {
    /// One slot per landmark; `None` marks a `null` / non-object slot.
    List(Vec<Option<LandmarkRecord>>),
    /// `poseLandmarks` was absent (`None`) or not an array (the raw value).
    Malformed(Option<JsonValue>),
}

impl FrameLandmarks {
    pub(crate) fn from_json(value: Option<&JsonValue>, id_keys: &[&str]) -> Self {
        match value {
            Some(JsonValue::Array(slots)) => Self::List(
                slots
                    .iter()
                    .map(|slot| LandmarkRecord::from_json(slot, id_keys))
                    .collect(),
            ),
            other => Self::Malformed(other.cloned()),
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[Option<LandmarkRecord>]> {
        match self {
            Self::List(slots) => Some(slots),
            Self::Malformed(_) => None,
        }
    }

    #[inline]
    fn is_missing(&self) -> bool {
        matches!(self, Self::Malformed(None))
    }
}

impl Serialize for FrameLandmarks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::List(slots) => slots.serialize(serializer),
            Self::Malformed(Some(raw)) => raw.serialize(serializer),
            Self::Malformed(None) => serializer.serialize_none(),
        }
    }
}

/// One recorded frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(
        rename = "poseLandmarks",
        skip_serializing_if = "FrameLandmarks::is_missing"
    )]
    pub pose_landmarks: FrameLandmarks,
}

impl Frame {
    pub fn new(timestamp: Option<f64>, records: Vec<Option<LandmarkRecord>>) -> Self {
        Self {
            timestamp,
            pose_landmarks: FrameLandmarks::List(records),
        }
    }
}

/// Validated pose sequence: `fps > 0`, at least one frame, and a landmark
/// list on the first frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseSequence {
    fps: f64,
    frames: Vec<Frame>,
}

/// Headline numbers a host shows after a load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SequenceSummary {
    pub fps: f64,
    pub frame_count: usize,
    pub duration_secs: f64,
}

impl PoseSequence {
    pub fn new(fps: f64, frames: Vec<Frame>) -> Result<Self, IngestError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(IngestError::schema(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        let Some(first) = frames.first() else {
            return Err(IngestError::schema("frames must not be empty"));
        };
        if first.pose_landmarks.as_list().is_none() {
            return Err(IngestError::schema(
                "first frame must carry a poseLandmarks array",
            ));
        }
        Ok(Self { fps, frames })
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for a validated sequence; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fixed frame interval in milliseconds.
    #[inline]
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    pub fn summary(&self) -> SequenceSummary {
        SequenceSummary {
            fps: self.fps,
            frame_count: self.frames.len(),
            duration_secs: self.frames.len() as f64 / self.fps,
        }
    }

    /// Canonical JSON form (`{ fps, frames: [{ timestamp?, poseLandmarks }] }`).
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }
}

impl SequenceSummary {
    /// Duration rounded for display, e.g. `"3.33"`.
    pub fn duration_label(&self) -> String {
        format!("{:.2}", self.duration_secs)
    }
}
