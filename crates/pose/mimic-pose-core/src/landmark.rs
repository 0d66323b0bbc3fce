//! Landmark model: raw records as found in pose files, and the fully
//! defaulted views handed to solvers.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A fully populated 3D landmark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: i64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Detection confidence in [0, 1].
    pub visibility: f32,
}

impl Landmark {
    /// Placeholder for an empty slot: origin, zero visibility.
    #[inline]
    pub fn absent(index: usize) -> Self {
        Self {
            id: index as i64,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            visibility: 0.0,
        }
    }

    /// Image-plane projection (depth dropped).
    #[inline]
    pub fn projected(&self) -> Landmark2D {
        Landmark2D {
            id: self.id,
            x: self.x,
            y: self.y,
            visibility: self.visibility,
        }
    }
}

/// 2D view of a landmark, consumed by solvers alongside the 3D set to resolve
/// depth-ambiguous joints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark2D {
    pub id: i64,
    pub x: f32,
    pub y: f32,
    pub visibility: f32,
}

/// A landmark as recorded, every field optional. Defaults are applied only
/// when the frame is solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl LandmarkRecord {
    pub const DEFAULT_VISIBILITY: f32 = 1.0;

    /// Read a record from a JSON slot. Returns `None` for slots that are not
    /// objects (`null`, numbers, ...). Fields holding non-numeric values count
    /// as absent. `id_keys` lists the identifier keys to try, in order.
    pub fn from_json(slot: &JsonValue, id_keys: &[&str]) -> Option<Self> {
        let obj = slot.as_object()?;
        let num = |key: &str| obj.get(key).and_then(JsonValue::as_f64);
        let id = id_keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(json_integer));
        Some(Self {
            id,
            x: num("x"),
            y: num("y"),
            z: num("z"),
            visibility: num("visibility"),
        })
    }

    /// Fill in defaults: `id` ← slot index, coordinates ← 0, visibility ← 1.
    #[inline]
    pub fn resolve(&self, index: usize) -> Landmark {
        Landmark {
            id: self.id.unwrap_or(index as i64),
            x: self.x.unwrap_or(0.0) as f32,
            y: self.y.unwrap_or(0.0) as f32,
            z: self.z.unwrap_or(0.0) as f32,
            visibility: self
                .visibility
                .map(|v| v as f32)
                .unwrap_or(Self::DEFAULT_VISIBILITY),
        }
    }
}

fn json_integer(v: &JsonValue) -> Option<i64> {
    v.as_i64().or_else(|| {
        v.as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_reads_alternate_id_key() {
        let rec = LandmarkRecord::from_json(
            &json!({ "landmark_id": 7, "x": 0.5, "y": 0.25 }),
            &["landmark_id", "id"],
        )
        .unwrap();
        assert_eq!(rec.id, Some(7));
        assert_eq!(rec.z, None);
        let lm = rec.resolve(0);
        assert_eq!(lm.id, 7);
        assert_eq!(lm.visibility, 1.0);
    }

    #[test]
    fn non_numeric_fields_count_as_absent() {
        let rec = LandmarkRecord::from_json(&json!({ "x": "left", "y": 2 }), &["id"]).unwrap();
        assert_eq!(rec.x, None);
        assert_eq!(rec.y, Some(2.0));
        assert_eq!(rec.resolve(3).x, 0.0);
        assert_eq!(rec.resolve(3).id, 3);
    }

    #[test]
    fn non_object_slots_are_not_records() {
        assert!(LandmarkRecord::from_json(&JsonValue::Null, &["id"]).is_none());
        assert!(LandmarkRecord::from_json(&json!(5), &["id"]).is_none());
    }

    #[test]
    fn projection_drops_depth() {
        let lm = Landmark {
            id: 2,
            x: 0.1,
            y: 0.2,
            z: 0.3,
            visibility: 0.9,
        };
        let p = lm.projected();
        assert_eq!((p.id, p.x, p.y, p.visibility), (2, 0.1, 0.2, 0.9));
    }
}
