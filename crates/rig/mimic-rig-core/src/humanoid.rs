//! Fixed naming tables: rig-frame segments, humanoid bones and expression channels.
//!
//! Segment keys are the case-sensitive field names a solver emits (`"LeftArm"`),
//! bone names are the humanoid identifiers hosts expose (`"leftUpperArm"`).

use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;

/// Normalized humanoid bone nodes a rig frame can drive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HumanoidBone {
    Head,
    Spine,
    LeftUpperArm,
    LeftLowerArm,
    RightUpperArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftUpperLeg,
    LeftLowerLeg,
    RightUpperLeg,
    RightLowerLeg,
}

impl HumanoidBone {
    pub const ALL: [HumanoidBone; 12] = [
        HumanoidBone::Head,
        HumanoidBone::Spine,
        HumanoidBone::LeftUpperArm,
        HumanoidBone::LeftLowerArm,
        HumanoidBone::RightUpperArm,
        HumanoidBone::RightLowerArm,
        HumanoidBone::LeftHand,
        HumanoidBone::RightHand,
        HumanoidBone::LeftUpperLeg,
        HumanoidBone::LeftLowerLeg,
        HumanoidBone::RightUpperLeg,
        HumanoidBone::RightLowerLeg,
    ];

    /// Humanoid bone identifier as exposed by the host rig.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Spine => "spine",
            Self::LeftUpperArm => "leftUpperArm",
            Self::LeftLowerArm => "leftLowerArm",
            Self::RightUpperArm => "rightUpperArm",
            Self::RightLowerArm => "rightLowerArm",
            Self::LeftHand => "leftHand",
            Self::RightHand => "rightHand",
            Self::LeftUpperLeg => "leftUpperLeg",
            Self::LeftLowerLeg => "leftLowerLeg",
            Self::RightUpperLeg => "rightUpperLeg",
            Self::RightLowerLeg => "rightLowerLeg",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == name)
    }
}

/// Body segments carried by a rig frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Head,
    Spine,
    LeftArm,
    RightArm,
    LeftHand,
    RightHand,
    LeftLeg,
    RightLeg,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Head,
        Segment::Spine,
        Segment::LeftArm,
        Segment::RightArm,
        Segment::LeftHand,
        Segment::RightHand,
        Segment::LeftLeg,
        Segment::RightLeg,
    ];

    /// Field name used by solvers for this segment.
    #[inline]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Spine => "Spine",
            Self::LeftArm => "LeftArm",
            Self::RightArm => "RightArm",
            Self::LeftHand => "LeftHand",
            Self::RightHand => "RightHand",
            Self::LeftLeg => "LeftLeg",
            Self::RightLeg => "RightLeg",
        }
    }

    #[inline]
    pub fn primary_bone(&self) -> HumanoidBone {
        match self {
            Self::Head => HumanoidBone::Head,
            Self::Spine => HumanoidBone::Spine,
            Self::LeftArm => HumanoidBone::LeftUpperArm,
            Self::RightArm => HumanoidBone::RightUpperArm,
            Self::LeftHand => HumanoidBone::LeftHand,
            Self::RightHand => HumanoidBone::RightHand,
            Self::LeftLeg => HumanoidBone::LeftUpperLeg,
            Self::RightLeg => HumanoidBone::RightUpperLeg,
        }
    }

    /// Nested joint driven by the segment's sub-target (forearm / knee).
    #[inline]
    pub fn secondary_bone(&self) -> Option<HumanoidBone> {
        match self {
            Self::LeftArm => Some(HumanoidBone::LeftLowerArm),
            Self::RightArm => Some(HumanoidBone::RightLowerArm),
            Self::LeftLeg => Some(HumanoidBone::LeftLowerLeg),
            Self::RightLeg => Some(HumanoidBone::RightLowerLeg),
            Self::Head | Self::Spine | Self::LeftHand | Self::RightHand => None,
        }
    }
}

/// Resolved rotation targets for one segment of a rig frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentTarget {
    pub primary: Rotation,
    pub secondary: Option<Rotation>,
}

/// Expression channels on the host's expression manager.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpressionChannel {
    Aa,
    Ih,
    Ou,
    Ee,
    Oh,
    Blink,
    Angry,
    Fun,
}

impl ExpressionChannel {
    pub const ALL: [ExpressionChannel; 8] = [
        ExpressionChannel::Aa,
        ExpressionChannel::Ih,
        ExpressionChannel::Ou,
        ExpressionChannel::Ee,
        ExpressionChannel::Oh,
        ExpressionChannel::Blink,
        ExpressionChannel::Angry,
        ExpressionChannel::Fun,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aa => "aa",
            Self::Ih => "ih",
            Self::Ou => "ou",
            Self::Ee => "ee",
            Self::Oh => "oh",
            Self::Blink => "blink",
            Self::Angry => "angry",
            Self::Fun => "fun",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bone_names_round_trip() {
        for bone in HumanoidBone::ALL {
            assert_eq!(HumanoidBone::from_name(bone.as_str()), Some(bone));
        }
        assert_eq!(HumanoidBone::from_name("LeftUpperArm"), None);
    }

    #[test]
    fn only_limbs_have_secondary_joints() {
        let with_secondary: Vec<Segment> = Segment::ALL
            .into_iter()
            .filter(|s| s.secondary_bone().is_some())
            .collect();
        assert_eq!(
            with_secondary,
            vec![
                Segment::LeftArm,
                Segment::RightArm,
                Segment::LeftLeg,
                Segment::RightLeg
            ]
        );
    }

    #[test]
    fn serde_names_match_as_str() {
        for bone in HumanoidBone::ALL {
            let s = serde_json::to_string(&bone).unwrap();
            assert_eq!(s, format!("\"{}\"", bone.as_str()));
        }
        for channel in ExpressionChannel::ALL {
            let s = serde_json::to_string(&channel).unwrap();
            assert_eq!(s, format!("\"{}\"", channel.as_str()));
        }
    }
}
