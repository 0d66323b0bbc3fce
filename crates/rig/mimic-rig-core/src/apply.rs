//! Writing rig frames onto a skeleton.

use serde::{Deserialize, Serialize};

use crate::frame::RigFrame;
use crate::humanoid::{HumanoidBone, Segment};
use crate::rotation::Rotation;
use crate::skeleton::HumanoidSkeleton;

/// What a single application touched. Misses are counted, never errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub bones_set: usize,
    /// Targets present in the frame whose bone node does not exist on the rig.
    pub bones_missing: usize,
    /// Targets with a NaN or infinite component; the bone keeps its pose.
    pub bones_rejected: usize,
    pub expressions_set: usize,
}

impl ApplyReport {
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.bones_set == 0 && self.expressions_set == 0
    }
}

/// Apply `frame` to `skeleton`.
///
/// - No skeleton bound: nothing happens.
/// - Segments absent from the frame, and bones absent from the rig, are skipped.
/// - Non-finite rotations are never written.
/// - A secondary joint (forearm / knee) is written only when the segment and its
///   nested target are both present.
/// - Expression weights are written by channel name; absent weights and
///   channels the rig does not expose are skipped.
///
/// Every write is an absolute set, so applying the same frame twice leaves the
/// skeleton in the same pose.
pub fn apply_rig_frame<S>(frame: &RigFrame, skeleton: Option<&mut S>) -> ApplyReport
where
    S: HumanoidSkeleton + ?Sized,
{
    let mut report = ApplyReport::default();
    let Some(skeleton) = skeleton else {
        return report;
    };

    for segment in Segment::ALL {
        let Some(target) = frame.segment(segment) else {
            continue;
        };
        write_bone(&mut report, skeleton, segment.primary_bone(), target.primary);
        if let (Some(bone), Some(rotation)) = (segment.secondary_bone(), target.secondary) {
            write_bone(&mut report, skeleton, bone, rotation);
        }
    }

    if let Some(expressions) = &frame.expressions {
        for (channel, weight) in expressions.channel_weights() {
            if let Some(weight) = weight {
                if skeleton.set_expression(channel, weight) {
                    report.expressions_set += 1;
                }
            }
        }
    }

    report
}

fn write_bone<S>(report: &mut ApplyReport, skeleton: &mut S, bone: HumanoidBone, rotation: Rotation)
where
    S: HumanoidSkeleton + ?Sized,
{
    if !rotation.is_finite() {
        report.bones_rejected += 1;
    } else if skeleton.set_bone_rotation(bone, rotation) {
        report.bones_set += 1;
    } else {
        report.bones_missing += 1;
    }
}
