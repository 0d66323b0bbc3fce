//! Mimic Pose Core (engine-agnostic)
//!
//! Turns recorded landmark data into rig frames:
//! - `ingest`: validates and normalizes the two accepted JSON encodings into a
//!   canonical [`PoseSequence`].
//! - `solver`: defaults per-frame landmarks and hands 3D + 2D views to an
//!   external [`PoseSolver`], producing one [`RigFrame`] per frame.

pub mod error;
pub mod ingest;
pub mod landmark;
pub mod sequence;
pub mod solver;

pub use error::{IngestError, SolveError};
pub use ingest::{ingest_bytes, ingest_reader, ingest_str, ingest_value, IngestReport, Ingested, InputFormat};
pub use landmark::{Landmark, Landmark2D, LandmarkRecord};
pub use sequence::{Frame, FrameLandmarks, PoseSequence, SequenceSummary, BULK_FPS};
pub use solver::{prepare_landmarks, solve_frame, solve_sequence, PoseSolver, SolverAdapter};

pub use mimic_rig_core::RigFrame;
