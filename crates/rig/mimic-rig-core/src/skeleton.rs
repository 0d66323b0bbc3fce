//! Skeleton trait implemented by host adapters, plus an in-memory rig.

use hashbrown::HashMap;

use crate::humanoid::{ExpressionChannel, HumanoidBone};
use crate::rotation::Rotation;

/// A loaded humanoid rig that rig frames can be written onto.
/// Adapters (wasm/engine hosts) implement this over their scene graph.
pub trait HumanoidSkeleton {
    /// Set the local rotation of a normalized bone node.
    /// Returns `false` when the rig has no node for `bone`.
    fn set_bone_rotation(&mut self, bone: HumanoidBone, rotation: Rotation) -> bool;

    /// Set an expression weight. Returns `false` when the rig has no such
    /// channel (or no expression manager at all).
    fn set_expression(&mut self, channel: ExpressionChannel, weight: f32) -> bool;
}

/// Headless skeleton storing the last written bone rotations and expression
/// weights. Only bones and channels it was created with exist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySkeleton {
    bones: HashMap<HumanoidBone, Rotation>,
    expressions: HashMap<ExpressionChannel, f32>,
}

impl MemorySkeleton {
    /// Every humanoid bone and every expression channel, at rest.
    pub fn full() -> Self {
        Self::with_parts(HumanoidBone::ALL, ExpressionChannel::ALL)
    }

    /// A partial rig exposing only the given bones and channels.
    pub fn with_parts(
        bones: impl IntoIterator<Item = HumanoidBone>,
        channels: impl IntoIterator<Item = ExpressionChannel>,
    ) -> Self {
        Self {
            bones: bones.into_iter().map(|b| (b, Rotation::IDENTITY)).collect(),
            expressions: channels.into_iter().map(|c| (c, 0.0)).collect(),
        }
    }

    #[inline]
    pub fn has_bone(&self, bone: HumanoidBone) -> bool {
        self.bones.contains_key(&bone)
    }

    #[inline]
    pub fn bone_rotation(&self, bone: HumanoidBone) -> Option<Rotation> {
        self.bones.get(&bone).copied()
    }

    #[inline]
    pub fn expression(&self, channel: ExpressionChannel) -> Option<f32> {
        self.expressions.get(&channel).copied()
    }

    /// Reset every bone to identity and every weight to zero.
    pub fn reset_pose(&mut self) {
        self.bones.values_mut().for_each(|r| *r = Rotation::IDENTITY);
        self.expressions.values_mut().for_each(|w| *w = 0.0);
    }
}

impl HumanoidSkeleton for MemorySkeleton {
    fn set_bone_rotation(&mut self, bone: HumanoidBone, rotation: Rotation) -> bool {
        match self.bones.get_mut(&bone) {
            Some(slot) => {
                *slot = rotation;
                true
            }
            None => false,
        }
    }

    fn set_expression(&mut self, channel: ExpressionChannel, weight: f32) -> bool {
        match self.expressions.get_mut(&channel) {
            Some(slot) => {
                *slot = weight;
                true
            }
            None => false,
        }
    }
}
