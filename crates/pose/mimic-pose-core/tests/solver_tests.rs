use mimic_pose_core::{ingest_str, Landmark, Landmark2D, SolveError, SolverAdapter};
use mimic_rig_core::{RigFrame, Rotation};
use mimic_test_fixtures::{poses, solvers};

/// it should default empty and partial landmarks before they reach the solver
#[test]
fn sparse_landmarks_are_defaulted() {
    let seq = ingest_str(&poses::json("sparse-landmarks").unwrap())
        .unwrap()
        .sequence;
    let adapter = SolverAdapter::new(|lms: &[Landmark], _: &[Landmark2D]| -> anyhow::Result<RigFrame> {
        assert_eq!(
            lms[0],
            Landmark {
                id: 0,
                x: 0.0,
                y: 0.0,
                z: 0.0,
                visibility: 0.0
            }
        );
        assert_eq!(
            lms[1],
            Landmark {
                id: 1,
                x: 1.0,
                y: 2.0,
                z: 0.0,
                visibility: 1.0
            }
        );
        Ok(RigFrame::default())
    });
    adapter.solve_all(&seq).unwrap();
}

/// it should produce identical rig frames for identical input
#[test]
fn ingest_and_solve_are_deterministic() {
    let text = poses::json("canonical-5f-30fps").unwrap();
    let adapter = SolverAdapter::new(solvers::echo);
    let a = adapter.solve_all(&ingest_str(&text).unwrap().sequence).unwrap();
    let b = adapter.solve_all(&ingest_str(&text).unwrap().sequence).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 5);
    assert_eq!(a[3].head, Some(Rotation::new(3.0, 0.5, -0.1)));
    assert!(a[3].left_arm.unwrap().forearm.is_none());
}

/// it should fail at the first malformed frame with its index
#[test]
fn malformed_frame_fails_the_sequence() {
    let seq = ingest_str(&poses::json("malformed-later-frame").unwrap())
        .unwrap()
        .sequence;
    let adapter = SolverAdapter::new(solvers::head_x);
    let err = adapter.solve_all(&seq).unwrap_err();
    assert_eq!(err, SolveError::MissingLandmarks { frame: 2 });
    assert_eq!(err.to_string(), "Invalid poseLandmarks format in frame 2");

    // frames either side still solve on their own
    assert!(adapter.solve(&seq.frames()[3], 3).is_ok());
}

/// it should carry the solver's message into the error
#[test]
fn solver_failures_keep_their_message() {
    let seq = ingest_str(r#"{"fps": 30, "frames": [{"poseLandmarks": [{"x": -2}]}]}"#)
        .unwrap()
        .sequence;
    let adapter = SolverAdapter::new(solvers::rejects_negative_x);
    match adapter.solve_all(&seq) {
        Err(SolveError::Solver { frame, reason }) => {
            assert_eq!(frame, 0);
            assert!(reason.contains("negative x"), "{reason}");
        }
        other => panic!("expected solver error, got {other:?}"),
    }
}
