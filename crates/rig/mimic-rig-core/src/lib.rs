//! Mimic Rig Core (engine-agnostic)
//!
//! Rig frames are the per-frame output of a pose solver: Euler rotation targets
//! for eight body segments plus optional facial expression weights. This crate
//! owns their data model, the fixed segment → humanoid bone naming, the
//! `HumanoidSkeleton` trait hosts implement, and `apply_rig_frame`, which writes
//! a rig frame onto a skeleton while tolerating missing bones and targets.

pub mod apply;
pub mod frame;
pub mod humanoid;
pub mod rotation;
pub mod skeleton;

// Re-exports for consumers (solvers, players, host adapters)
pub use apply::{apply_rig_frame, ApplyReport};
pub use frame::{ArmTarget, BrowShape, Expressions, EyeShape, LegTarget, MouthShape, RigFrame};
pub use humanoid::{ExpressionChannel, HumanoidBone, Segment, SegmentTarget};
pub use rotation::Rotation;
pub use skeleton::{HumanoidSkeleton, MemorySkeleton};
