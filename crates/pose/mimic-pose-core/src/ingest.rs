//! Pose-sequence ingestion.
//!
//! Accepts either encoding and normalizes it into a [`PoseSequence`]:
//! - canonical: `{ "fps": 30, "frames": [{ "timestamp"?: .., "poseLandmarks": [..] }] }`
//! - bulk: `[[{ "landmark_id": 0, "x": .. }, ..], ..]`, converted with
//!   `fps = 30` and `timestamp = index / 30`.
//!
//! Only the first frame is structurally validated; per-landmark defaults are
//! applied later, when frames are solved.

use std::io::Read;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::IngestError;
use crate::sequence::{Frame, FrameLandmarks, PoseSequence, BULK_FPS};

const CANONICAL_ID_KEYS: &[&str] = &["id"];
const BULK_ID_KEYS: &[&str] = &["landmark_id", "id"];
const BOM: char = '\u{feff}';

/// Which encoding the input used.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum InputFormat {
    Canonical,
    Bulk,
}

/// Diagnostics gathered while ingesting. Never an error by itself.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IngestReport {
    pub format: InputFormat,
    /// Bulk frames dropped for not being non-empty arrays.
    pub dropped_frames: usize,
}

/// A normalized sequence plus its ingestion report.
#[derive(Clone, Debug, PartialEq)]
pub struct Ingested {
    pub sequence: PoseSequence,
    pub report: IngestReport,
}

/// Ingest raw bytes (UTF-8 JSON text, optionally BOM-prefixed).
pub fn ingest_bytes(raw: &[u8]) -> Result<Ingested, IngestError> {
    let text = std::str::from_utf8(raw).map_err(|e| IngestError::Parse {
        reason: format!("input is not UTF-8: {e}"),
    })?;
    ingest_str(text)
}

/// Ingest JSON text. A leading byte-order mark is ignored.
pub fn ingest_str(text: &str) -> Result<Ingested, IngestError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let value: JsonValue = serde_json::from_str(text)?;
    ingest_value(value)
}

/// Ingest from any byte source (file, socket, ...).
pub fn ingest_reader<R: Read>(mut reader: R) -> Result<Ingested, IngestError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    ingest_bytes(&buf)
}

/// Ingest an already parsed JSON document.
pub fn ingest_value(value: JsonValue) -> Result<Ingested, IngestError> {
    match value {
        JsonValue::Object(obj) => ingest_canonical(&obj),
        JsonValue::Array(frames) => ingest_bulk(&frames),
        other => Err(IngestError::schema(format!(
            "expected an object or an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn ingest_canonical(obj: &Map<String, JsonValue>) -> Result<Ingested, IngestError> {
    let fps = obj
        .get("fps")
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| IngestError::schema("Invalid or missing fps value"))?;
    if fps <= 0.0 || !fps.is_finite() {
        return Err(IngestError::schema("Invalid or missing fps value"));
    }

    let raw_frames = match obj.get("frames").and_then(JsonValue::as_array) {
        Some(frames) if !frames.is_empty() => frames,
        _ => return Err(IngestError::schema("Invalid or empty frames array")),
    };

    let first_ok = raw_frames[0]
        .get("poseLandmarks")
        .map_or(false, JsonValue::is_array);
    if !first_ok {
        return Err(IngestError::schema("Invalid frame structure"));
    }

    let frames = raw_frames
        .iter()
        .map(|raw| Frame {
            timestamp: raw.get("timestamp").and_then(JsonValue::as_f64),
            pose_landmarks: FrameLandmarks::from_json(raw.get("poseLandmarks"), CANONICAL_ID_KEYS),
        })
        .collect();

    Ok(Ingested {
        sequence: PoseSequence::new(fps, frames)?,
        report: IngestReport {
            format: InputFormat::Canonical,
            dropped_frames: 0,
        },
    })
}

fn ingest_bulk(raw_frames: &[JsonValue]) -> Result<Ingested, IngestError> {
    let mut frames = Vec::with_capacity(raw_frames.len());
    let mut dropped = 0usize;

    for raw in raw_frames {
        match raw.as_array() {
            Some(slots) if !slots.is_empty() => {
                let timestamp = frames.len() as f64 / BULK_FPS;
                frames.push(Frame {
                    timestamp: Some(timestamp),
                    pose_landmarks: FrameLandmarks::from_json(Some(raw), BULK_ID_KEYS),
                });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        log::warn!(
            "bulk pose data: dropped {dropped} of {} frames that were not non-empty arrays",
            raw_frames.len()
        );
    }
    if frames.is_empty() {
        return Err(IngestError::EmptySequence {
            dropped_frames: dropped,
        });
    }

    Ok(Ingested {
        sequence: PoseSequence::new(BULK_FPS, frames)?,
        report: IngestReport {
            format: InputFormat::Bulk,
            dropped_frames: dropped,
        },
    })
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
