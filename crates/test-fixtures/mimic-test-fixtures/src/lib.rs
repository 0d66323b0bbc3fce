use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    poses: HashMap<String, PoseEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PoseEntry {
    Path(String),
    Detailed {
        path: String,
        fps: f64,
        frames: usize,
    },
}

impl PoseEntry {
    fn as_path(&self) -> &str {
        match self {
            PoseEntry::Path(path) => path,
            PoseEntry::Detailed { path, .. } => path,
        }
    }
}

/// fps and frame count a loadable fixture is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expected {
    pub fps: f64,
    pub frames: usize,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_bytes(rel: &str) -> Result<Vec<u8>> {
    let path = resolve_path(rel);
    fs::read(&path).with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod poses {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.poses.keys().cloned().collect()
    }

    /// Names of fixtures that are expected to load.
    pub fn loadable() -> Vec<String> {
        MANIFEST
            .poses
            .iter()
            .filter(|(_, entry)| matches!(entry, PoseEntry::Detailed { .. }))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn expected(name: &str) -> Result<Option<Expected>> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        Ok(match entry {
            PoseEntry::Path(_) => None,
            PoseEntry::Detailed { fps, frames, .. } => Some(Expected {
                fps: *fps,
                frames: *frames,
            }),
        })
    }

    /// Raw file contents, byte-order mark included.
    pub fn bytes(name: &str) -> Result<Vec<u8>> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        read_bytes(entry.as_path())
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.poses, "pose", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}

/// Deterministic stand-ins for the external landmark solver.
pub mod solvers {
    use anyhow::{bail, Result};
    use mimic_pose_core::{Landmark, Landmark2D};
    use mimic_rig_core::{ArmTarget, EyeShape, Expressions, MouthShape, RigFrame, Rotation};

    fn rotation_of(lm: &Landmark) -> Rotation {
        Rotation::new(lm.x, lm.y, lm.z)
    }

    /// Copies landmark coordinates straight into rotations:
    /// landmark 0 → Head, 1 → Spine, 2 → LeftArm (3 → its forearm).
    /// Mouth `a` carries landmark 0's visibility and blink its 2D `y`.
    pub fn echo(landmarks: &[Landmark], projected: &[Landmark2D]) -> Result<RigFrame> {
        let Some(first) = landmarks.first() else {
            bail!("no landmarks");
        };
        Ok(RigFrame {
            head: Some(rotation_of(first)),
            spine: landmarks.get(1).map(rotation_of),
            left_arm: landmarks.get(2).map(|lm| ArmTarget {
                upper: rotation_of(lm),
                forearm: landmarks.get(3).map(rotation_of),
            }),
            expressions: Some(Expressions {
                mouth: Some(MouthShape {
                    a: Some(first.visibility),
                    ..Default::default()
                }),
                eye: projected.first().map(|p| EyeShape { blink: Some(p.y) }),
                brow: None,
            }),
            ..Default::default()
        })
    }

    /// Head x = landmark 0's x. With the pose fixtures this is the frame index.
    pub fn head_x(landmarks: &[Landmark], _projected: &[Landmark2D]) -> Result<RigFrame> {
        let x = landmarks.first().map_or(0.0, |lm| lm.x);
        Ok(RigFrame {
            head: Some(Rotation::new(x, 0.0, 0.0)),
            ..Default::default()
        })
    }

    /// Rejects any frame whose landmark 0 has a negative x.
    pub fn rejects_negative_x(landmarks: &[Landmark], projected: &[Landmark2D]) -> Result<RigFrame> {
        match landmarks.first() {
            Some(lm) if lm.x < 0.0 => bail!("landmark 0 has negative x ({})", lm.x),
            _ => head_x(landmarks, projected),
        }
    }
}
