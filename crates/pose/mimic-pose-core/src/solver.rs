//! Solver adapter.
//!
//! The landmark → joint-angle math is an external capability behind
//! [`PoseSolver`]. The adapter prepares its inputs (defaulted 3D landmarks plus
//! their 2D projection) and turns failures into [`SolveError`]s tagged with
//! the frame index. Solving is per frame with no cross-frame state.

use mimic_rig_core::RigFrame;

use crate::error::SolveError;
use crate::landmark::{Landmark, Landmark2D, LandmarkRecord};
use crate::sequence::{Frame, PoseSequence};

/// External pose solver: landmarks in, rig frame out.
pub trait PoseSolver {
    fn solve(&self, landmarks: &[Landmark], projected: &[Landmark2D]) -> anyhow::Result<RigFrame>;
}

impl<F> PoseSolver for F
where
    F: Fn(&[Landmark], &[Landmark2D]) -> anyhow::Result<RigFrame>,
{
    #[inline]
    fn solve(&self, landmarks: &[Landmark], projected: &[Landmark2D]) -> anyhow::Result<RigFrame> {
        self(landmarks, projected)
    }
}

/// Default every slot and derive the 2D view.
///
/// An empty slot at index `i` becomes `{ id: i, x: 0, y: 0, z: 0, visibility: 0 }`;
/// a present record gets `id ← i`, coordinates `← 0` and `visibility ← 1.0`
/// for whatever it lacks.
pub fn prepare_landmarks(slots: &[Option<LandmarkRecord>]) -> (Vec<Landmark>, Vec<Landmark2D>) {
    let landmarks: Vec<Landmark> = slots
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            Some(record) => record.resolve(i),
            None => Landmark::absent(i),
        })
        .collect();
    let projected = landmarks.iter().map(Landmark::projected).collect();
    (landmarks, projected)
}

/// Wraps a [`PoseSolver`] with input preparation and error tagging.
#[derive(Debug, Clone)]
pub struct SolverAdapter<S> {
    solver: S,
}

impl<S: PoseSolver> SolverAdapter<S> {
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Solve one frame. `index` is only used to tag errors.
    #[inline]
    pub fn solve(&self, frame: &Frame, index: usize) -> Result<RigFrame, SolveError> {
        solve_frame(&self.solver, frame, index)
    }

    #[inline]
    pub fn solve_all(&self, sequence: &PoseSequence) -> Result<Vec<RigFrame>, SolveError> {
        solve_sequence(&self.solver, sequence)
    }
}

/// Default the frame's landmarks and run the solver on them.
pub fn solve_frame<S>(solver: &S, frame: &Frame, index: usize) -> Result<RigFrame, SolveError>
where
    S: PoseSolver + ?Sized,
{
    let slots = frame
        .pose_landmarks
        .as_list()
        .ok_or(SolveError::MissingLandmarks { frame: index })?;
    if slots.is_empty() {
        return Err(SolveError::EmptyLandmarks { frame: index });
    }
    let (landmarks, projected) = prepare_landmarks(slots);
    solver
        .solve(&landmarks, &projected)
        .map_err(|e| SolveError::Solver {
            frame: index,
            reason: format!("{e:#}"),
        })
}

/// Solve every frame in order, stopping at the first failure.
pub fn solve_sequence<S>(solver: &S, sequence: &PoseSequence) -> Result<Vec<RigFrame>, SolveError>
where
    S: PoseSolver + ?Sized,
{
    sequence
        .frames()
        .iter()
        .enumerate()
        .map(|(i, frame)| solve_frame(solver, frame, i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::FrameLandmarks;
    use mimic_rig_core::Rotation;

    fn head_from_first(landmarks: &[Landmark], _: &[Landmark2D]) -> anyhow::Result<RigFrame> {
        let first = landmarks
            .first()
            .ok_or_else(|| anyhow::anyhow!("no landmarks"))?;
        Ok(RigFrame {
            head: Some(Rotation::new(first.x, first.y, first.z)),
            ..Default::default()
        })
    }

    #[test]
    fn empty_and_partial_slots_are_defaulted() {
        let slots = vec![
            None,
            Some(LandmarkRecord {
                x: Some(1.0),
                y: Some(2.0),
                ..Default::default()
            }),
        ];
        let (landmarks, projected) = prepare_landmarks(&slots);
        assert_eq!(
            landmarks,
            vec![
                Landmark {
                    id: 0,
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                    visibility: 0.0
                },
                Landmark {
                    id: 1,
                    x: 1.0,
                    y: 2.0,
                    z: 0.0,
                    visibility: 1.0
                },
            ]
        );
        assert_eq!(projected[1].x, 1.0);
        assert_eq!(projected[1].y, 2.0);
        assert_eq!(projected[0].visibility, 0.0);
        // source untouched
        assert_eq!(slots[0], None);
        assert_eq!(slots[1].unwrap().z, None);
    }

    #[test]
    fn solve_sequence_stops_at_first_bad_frame() {
        let frames = vec![
            Frame::new(Some(0.0), vec![None]),
            Frame::new(Some(0.1), Vec::new()),
            Frame {
                timestamp: None,
                pose_landmarks: FrameLandmarks::Malformed(None),
            },
        ];
        let seq = PoseSequence::new(10.0, frames).unwrap();
        assert_eq!(
            solve_sequence(&head_from_first, &seq),
            Err(SolveError::EmptyLandmarks { frame: 1 })
        );
    }

    #[test]
    fn malformed_frames_fail_when_solved() {
        let adapter = SolverAdapter::new(head_from_first);
        let frame = Frame {
            timestamp: None,
            pose_landmarks: FrameLandmarks::Malformed(None),
        };
        assert_eq!(
            adapter.solve(&frame, 3),
            Err(SolveError::MissingLandmarks { frame: 3 })
        );
        let empty = Frame::new(None, Vec::new());
        assert_eq!(
            adapter.solve(&empty, 1),
            Err(SolveError::EmptyLandmarks { frame: 1 })
        );
    }

    #[test]
    fn solver_errors_are_tagged_with_the_frame() {
        let failing = |_: &[Landmark], _: &[Landmark2D]| -> anyhow::Result<RigFrame> {
            anyhow::bail!("singular pose")
        };
        let adapter = SolverAdapter::new(failing);
        let frame = Frame::new(None, vec![None]);
        let err = adapter.solve(&frame, 9).unwrap_err();
        assert_eq!(
            err,
            SolveError::Solver {
                frame: 9,
                reason: "singular pose".into()
            }
        );
    }
}
