//! Rig frame data model.
//!
//! Field names follow the solver's JSON output (`"Head"`, `"LeftArm": { x, y, z,
//! forearm }`, `"expressions": { mouth, eye, brow }`) so a solver implemented on
//! the host side can hand its result over as plain JSON. Unknown segments are
//! ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::humanoid::{ExpressionChannel, Segment, SegmentTarget};
use crate::rotation::Rotation;

/// Upper-arm rotation with an optional forearm target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmTarget {
    #[serde(flatten)]
    pub upper: Rotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forearm: Option<Rotation>,
}

/// Upper-leg rotation with an optional knee target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegTarget {
    #[serde(flatten)]
    pub upper: Rotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knee: Option<Rotation>,
}

/// Vowel mouth shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MouthShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blink: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angry: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun: Option<f32>,
}

/// Facial expression weights grouped the way solvers report them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Expressions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth: Option<MouthShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<EyeShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brow: Option<BrowShape>,
}

impl Expressions {
    /// Weights keyed by host channel, in a fixed order. Absent groups and
    /// absent weights yield `None`.
    pub fn channel_weights(&self) -> [(ExpressionChannel, Option<f32>); 8] {
        let mouth = self.mouth.unwrap_or_default();
        let eye = self.eye.unwrap_or_default();
        let brow = self.brow.unwrap_or_default();
        [
            (ExpressionChannel::Aa, mouth.a),
            (ExpressionChannel::Ih, mouth.i),
            (ExpressionChannel::Ou, mouth.u),
            (ExpressionChannel::Ee, mouth.e),
            (ExpressionChannel::Oh, mouth.o),
            (ExpressionChannel::Blink, eye.blink),
            (ExpressionChannel::Angry, brow.angry),
            (ExpressionChannel::Fun, brow.fun),
        ]
    }
}

/// Per-frame rotation targets produced by a pose solver. Immutable once produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigFrame {
    #[serde(rename = "Head", default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Rotation>,
    #[serde(rename = "Spine", default, skip_serializing_if = "Option::is_none")]
    pub spine: Option<Rotation>,
    #[serde(rename = "LeftArm", default, skip_serializing_if = "Option::is_none")]
    pub left_arm: Option<ArmTarget>,
    #[serde(rename = "RightArm", default, skip_serializing_if = "Option::is_none")]
    pub right_arm: Option<ArmTarget>,
    #[serde(rename = "LeftHand", default, skip_serializing_if = "Option::is_none")]
    pub left_hand: Option<Rotation>,
    #[serde(rename = "RightHand", default, skip_serializing_if = "Option::is_none")]
    pub right_hand: Option<Rotation>,
    #[serde(rename = "LeftLeg", default, skip_serializing_if = "Option::is_none")]
    pub left_leg: Option<LegTarget>,
    #[serde(rename = "RightLeg", default, skip_serializing_if = "Option::is_none")]
    pub right_leg: Option<LegTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Expressions>,
}

impl RigFrame {
    /// Targets for one segment, or `None` when the solver produced nothing for it.
    pub fn segment(&self, segment: Segment) -> Option<SegmentTarget> {
        let arm = |a: &ArmTarget| SegmentTarget {
            primary: a.upper,
            secondary: a.forearm,
        };
        let leg = |l: &LegTarget| SegmentTarget {
            primary: l.upper,
            secondary: l.knee,
        };
        let single = |r: &Rotation| SegmentTarget {
            primary: *r,
            secondary: None,
        };
        match segment {
            Segment::Head => self.head.as_ref().map(single),
            Segment::Spine => self.spine.as_ref().map(single),
            Segment::LeftArm => self.left_arm.as_ref().map(arm),
            Segment::RightArm => self.right_arm.as_ref().map(arm),
            Segment::LeftHand => self.left_hand.as_ref().map(single),
            Segment::RightHand => self.right_hand.as_ref().map(single),
            Segment::LeftLeg => self.left_leg.as_ref().map(leg),
            Segment::RightLeg => self.right_leg.as_ref().map(leg),
        }
    }

    /// True when the frame carries no segment and no expression data.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_none() && Segment::ALL.iter().all(|s| self.segment(*s).is_none())
    }
}
