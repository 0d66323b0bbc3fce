//! `PosePlayer`: the façade hosts drive once per render cycle.
//!
//! Owns the loaded sequence, its rig frames and the transport. The skeleton
//! and the time medium belong to the host; the player only borrows them while
//! applying a frame or syncing a position.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mimic_pose_core::{
    ingest_bytes, ingest_str, ingest_value, Ingested, PoseSequence, PoseSolver, SequenceSummary,
    SolverAdapter,
};
use mimic_rig_core::{apply_rig_frame, ApplyReport, HumanoidSkeleton, RigFrame};
use serde_json::Value as JsonValue;

use crate::config::{PlaybackConfig, SolvePolicy};
use crate::error::PlaybackError;
use crate::events::{EventBuffer, PlaybackEvent};
use crate::loader::{LoadTicket, LoadTracker};
use crate::media::TimeMedium;
use crate::state::{PlaybackState, TransportState};
use crate::transport::Transport;

pub const STATUS_NO_DATA: &str = "No pose data loaded";
pub const STATUS_LOADED: &str = "Pose data loaded";
pub const STATUS_LOAD_FAILED: &str = "Error loading pose data";
pub const STATUS_SOLVE_FAILED: &str = "Error processing pose data";

/// Host-owned skeleton. The player keeps a weak reference only.
pub type SkeletonHandle = Rc<RefCell<dyn HumanoidSkeleton>>;
/// Host-owned time medium.
pub type MediumHandle = Rc<RefCell<dyn TimeMedium>>;

/// Raw pose data handed to a load.
#[derive(Clone, Debug)]
pub enum LoadSource<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    Json(JsonValue),
}

impl<'a> From<&'a [u8]> for LoadSource<'a> {
    fn from(raw: &'a [u8]) -> Self {
        Self::Bytes(raw)
    }
}

impl<'a> From<&'a str> for LoadSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl From<JsonValue> for LoadSource<'_> {
    fn from(value: JsonValue) -> Self {
        Self::Json(value)
    }
}

impl LoadSource<'_> {
    fn ingest(self) -> Result<Ingested, PlaybackError> {
        let ingested = match self {
            Self::Bytes(raw) => ingest_bytes(raw)?,
            Self::Text(text) => ingest_str(text)?,
            Self::Json(value) => ingest_value(value)?,
        };
        Ok(ingested)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum FrameSlot {
    Pending,
    Ready(RigFrame),
    Failed(String),
}

struct Loaded {
    sequence: PoseSequence,
    frames: Vec<FrameSlot>,
}

pub struct PosePlayer<S> {
    config: PlaybackConfig,
    adapter: SolverAdapter<S>,
    loaded: Option<Loaded>,
    transport: Transport,
    skeleton: Option<Weak<RefCell<dyn HumanoidSkeleton>>>,
    medium: Option<MediumHandle>,
    loads: LoadTracker,
    events: EventBuffer,
    status: String,
    renders: u64,
}

impl<S: PoseSolver> PosePlayer<S> {
    pub fn new(solver: S) -> Self {
        Self::with_config(solver, PlaybackConfig::default())
    }

    pub fn with_config(solver: S, config: PlaybackConfig) -> Self {
        let events = EventBuffer::new(config.max_events);
        Self {
            config,
            adapter: SolverAdapter::new(solver),
            loaded: None,
            transport: Transport::new(),
            skeleton: None,
            medium: None,
            loads: LoadTracker::new(),
            events,
            status: STATUS_NO_DATA.to_string(),
            renders: 0,
        }
    }

    #[inline]
    pub fn solver(&self) -> &S {
        self.adapter.solver()
    }

    // ---------- loading ----------

    /// Start a load attempt. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Ingest and solve `source`, then commit it if `ticket` is still the
    /// latest. On any failure the current sequence and playback state are kept.
    pub fn finish_load<'a>(
        &mut self,
        ticket: LoadTicket,
        source: impl Into<LoadSource<'a>>,
    ) -> Result<SequenceSummary, PlaybackError> {
        self.check_ticket(ticket)?;
        let ingested = match source.into().ingest() {
            Ok(ingested) => ingested,
            Err(err) => return Err(self.reject(err)),
        };
        let frames = match self.solve_for_load(&ingested.sequence) {
            Ok(frames) => frames,
            Err(err) => return Err(self.reject(err)),
        };
        Ok(self.commit(ingested, frames))
    }

    /// Report a host-side failure (file read, fetch) for `ticket`.
    pub fn fail_load(&mut self, ticket: LoadTicket, reason: &str) -> Result<(), PlaybackError> {
        self.check_ticket(ticket)?;
        self.reject(PlaybackError::Source {
            reason: reason.to_string(),
        });
        Ok(())
    }

    pub fn load_bytes(&mut self, raw: &[u8]) -> Result<SequenceSummary, PlaybackError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, raw)
    }

    pub fn load_str(&mut self, text: &str) -> Result<SequenceSummary, PlaybackError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, text)
    }

    pub fn load_value(&mut self, value: JsonValue) -> Result<SequenceSummary, PlaybackError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, value)
    }

    fn check_ticket(&mut self, ticket: LoadTicket) -> Result<(), PlaybackError> {
        if self.loads.is_current(ticket) {
            return Ok(());
        }
        let current = self.loads.current().0;
        log::warn!("discarding stale load {} (latest is {current})", ticket.0);
        self.events.push(PlaybackEvent::StaleLoadDiscarded {
            ticket: ticket.0,
            current,
        });
        Err(PlaybackError::StaleLoad {
            ticket: ticket.0,
            current,
        })
    }

    fn solve_for_load(&self, sequence: &PoseSequence) -> Result<Vec<FrameSlot>, PlaybackError> {
        match self.config.solve_policy {
            SolvePolicy::Eager => Ok(self
                .adapter
                .solve_all(sequence)?
                .into_iter()
                .map(FrameSlot::Ready)
                .collect()),
            SolvePolicy::OnDemand => Ok(vec![FrameSlot::Pending; sequence.len()]),
        }
    }

    fn reject(&mut self, err: PlaybackError) -> PlaybackError {
        log::warn!("pose data rejected ({}): {err}", err.category());
        let status = match &err {
            PlaybackError::Solve(_) => STATUS_SOLVE_FAILED,
            _ => STATUS_LOAD_FAILED,
        };
        self.events.push(PlaybackEvent::LoadRejected {
            category: err.category().to_string(),
            message: err.to_string(),
        });
        self.set_status(status);
        err
    }

    fn commit(&mut self, ingested: Ingested, frames: Vec<FrameSlot>) -> SequenceSummary {
        let Ingested { sequence, report } = ingested;
        let summary = sequence.summary();
        let from = self.transport.state();
        self.transport.load(summary.frame_count, summary.fps);
        self.loaded = Some(Loaded { sequence, frames });

        log::info!(
            "pose data loaded: {} frames at {} fps ({}s)",
            summary.frame_count,
            summary.fps,
            summary.duration_label()
        );
        self.events.push(PlaybackEvent::Loaded {
            summary,
            format: report.format,
            dropped_frames: report.dropped_frames,
        });
        self.note_transition(from);
        self.set_status(STATUS_LOADED);
        summary
    }

    // ---------- transport ----------

    /// Start playing from the current frame. With nothing loaded the state is
    /// left unchanged and the status reads "No pose data loaded".
    pub fn play(&mut self, now_ms: f64) -> Result<(), PlaybackError> {
        let from = self.transport.state();
        if let Err(err) = self.transport.play(now_ms) {
            self.set_status(STATUS_NO_DATA);
            return Err(err);
        }
        log::info!(
            "starting playback with {} frames at {} fps",
            self.transport.frame_count(),
            self.transport.fps()
        );
        self.note_transition(from);
        Ok(())
    }

    pub fn pause(&mut self) {
        let from = self.transport.state();
        self.transport.pause();
        self.note_transition(from);
    }

    /// Back to frame 0 and rewind the medium.
    pub fn stop(&mut self) {
        let from = self.transport.state();
        self.transport.stop();
        self.note_transition(from);
        self.sync_medium(0.0);
    }

    /// Play if not playing, otherwise pause.
    pub fn toggle(&mut self, now_ms: f64) -> Result<(), PlaybackError> {
        if self.transport.state().is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play(now_ms)
        }
    }

    /// Jump to `index` (clamped) and present that frame immediately, whatever
    /// the transport state. Returns the frame now current.
    pub fn seek(&mut self, index: i64) -> Option<usize> {
        let from = self.transport.state();
        let index = self.transport.seek(index)?;
        self.note_transition(from);
        self.present(index);
        Some(index)
    }

    /// Seek relative to the current frame.
    pub fn step(&mut self, delta: i64) -> Option<usize> {
        let from = self.transport.state();
        let index = self.transport.step(delta)?;
        self.note_transition(from);
        self.present(index);
        Some(index)
    }

    /// Call once per render cycle. Returns the index presented when a frame
    /// was due.
    pub fn tick(&mut self, now_ms: f64) -> Option<usize> {
        self.renders = self.renders.wrapping_add(1);
        let shown = self.transport.tick(now_ms)?;
        if self.config.debug {
            log::debug!(
                "frame update: {shown} of {}",
                self.transport.frame_count()
            );
        }
        self.present(shown);
        Some(shown)
    }

    // ---------- host bindings ----------

    /// Target `skeleton` from the next application on. Replaces any earlier
    /// binding. Dropping every strong handle unbinds implicitly.
    pub fn bind_skeleton(&mut self, skeleton: &SkeletonHandle) {
        self.skeleton = Some(Rc::downgrade(skeleton));
    }

    pub fn unbind_skeleton(&mut self) {
        self.skeleton = None;
    }

    /// True while a bound skeleton is still alive.
    pub fn has_skeleton(&self) -> bool {
        self.skeleton
            .as_ref()
            .map_or(false, |weak| weak.strong_count() > 0)
    }

    pub fn bind_medium(&mut self, medium: MediumHandle) {
        self.medium = Some(medium);
    }

    pub fn unbind_medium(&mut self) {
        self.medium = None;
    }

    // ---------- queries ----------

    pub fn state(&self) -> PlaybackState {
        self.transport.snapshot()
    }

    #[inline]
    pub fn transport_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn summary(&self) -> Option<SequenceSummary> {
        self.loaded.as_ref().map(|l| l.sequence.summary())
    }

    pub fn sequence(&self) -> Option<&PoseSequence> {
        self.loaded.as_ref().map(|l| &l.sequence)
    }

    /// Solved rig data for `index`, if it has been solved.
    pub fn rig_frame(&self, index: usize) -> Option<&RigFrame> {
        match self.loaded.as_ref()?.frames.get(index)? {
            FrameSlot::Ready(frame) => Some(frame),
            FrameSlot::Pending | FrameSlot::Failed(_) => None,
        }
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Number of `tick` calls so far; every tick is a render.
    #[inline]
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        self.events.drain()
    }

    // ---------- internals ----------

    fn present(&mut self, index: usize) {
        self.apply_frame(index);
        self.events.push(PlaybackEvent::FrameChanged { index });
        let seconds = index as f64 / self.transport.fps();
        self.sync_medium(seconds);
    }

    fn apply_frame(&mut self, index: usize) -> Option<ApplyReport> {
        self.ensure_solved(index);
        let loaded = self.loaded.as_ref()?;
        let frame = match loaded.frames.get(index)? {
            FrameSlot::Ready(frame) => frame,
            FrameSlot::Failed(reason) => {
                self.events.push(PlaybackEvent::FrameSkipped {
                    index,
                    reason: reason.clone(),
                });
                return None;
            }
            FrameSlot::Pending => return None,
        };

        let skeleton = self.skeleton.as_ref().and_then(Weak::upgrade)?;
        let report = match skeleton.try_borrow_mut() {
            Ok(mut target) => apply_rig_frame(frame, Some(&mut *target)),
            Err(_) => {
                log::warn!("skeleton busy; frame {index} not applied");
                return None;
            }
        };
        if self.config.debug && report.bones_missing > 0 {
            log::debug!("frame {index}: {} bones missing on rig", report.bones_missing);
        }
        Some(report)
    }

    fn ensure_solved(&mut self, index: usize) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let Some(slot) = loaded.frames.get_mut(index) else {
            return;
        };
        if !matches!(slot, FrameSlot::Pending) {
            return;
        }
        let Some(frame) = loaded.sequence.frame(index) else {
            return;
        };
        *slot = match self.adapter.solve(frame, index) {
            Ok(rig) => FrameSlot::Ready(rig),
            Err(err) => {
                log::warn!("skipping frame {index}: {err}");
                FrameSlot::Failed(err.to_string())
            }
        };
    }

    fn sync_medium(&mut self, seconds: f64) {
        let mut written = false;
        if let Some(medium) = self.medium.as_ref() {
            match medium.try_borrow_mut() {
                Ok(mut medium) => {
                    if medium.is_ready() || !self.config.require_media_ready {
                        medium.set_current_time(seconds);
                        written = true;
                    }
                }
                Err(_) => log::warn!("medium busy; position {seconds}s not written"),
            }
        }
        self.events
            .push(PlaybackEvent::MediaSynced { seconds, written });
    }

    fn note_transition(&mut self, from: TransportState) {
        let to = self.transport.state();
        if from != to {
            self.events.push(PlaybackEvent::StateChanged { from, to });
        }
    }

    fn set_status(&mut self, message: &str) {
        self.status = message.to_string();
        self.events.push(PlaybackEvent::Status {
            message: self.status.clone(),
        });
    }
}
