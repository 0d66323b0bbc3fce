//! Transport state machine over a frame count and frame rate.
//!
//! Pure bookkeeping: it decides which frame is current and when to advance,
//! and leaves applying rig data and syncing media to the player.

use crate::clock::FrameClock;
use crate::error::PlaybackError;
use crate::state::{PlaybackState, TransportState};

#[derive(Clone, Debug, Default)]
pub struct Transport {
    state: TransportState,
    index: usize,
    frame_count: usize,
    fps: f64,
    clock: Option<FrameClock>,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timeline: Paused at frame 0 with a fresh clock.
    pub fn load(&mut self, frame_count: usize, fps: f64) {
        self.state = TransportState::Paused;
        self.index = 0;
        self.frame_count = frame_count;
        self.fps = fps;
        self.clock = (frame_count > 0).then(|| FrameClock::new(fps));
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.frame_count > 0
    }

    #[inline]
    pub fn state(&self) -> TransportState {
        self.state
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn play(&mut self, now_ms: f64) -> Result<(), PlaybackError> {
        let clock = self.clock.as_mut().ok_or(PlaybackError::NoData)?;
        clock.arm(now_ms);
        self.state = TransportState::Playing;
        Ok(())
    }

    /// Playing → Paused. Other states are left as they are.
    pub fn pause(&mut self) {
        if self.state.is_playing() {
            self.state = TransportState::Paused;
        }
        self.clear_clock();
    }

    pub fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.index = 0;
        self.clear_clock();
    }

    /// Clamp `index` into the timeline and make it current. `None` when
    /// nothing is loaded.
    ///
    /// Stopped pins the index to 0, so seeking anywhere else while Stopped
    /// moves the transport to Paused.
    pub fn seek(&mut self, index: i64) -> Option<usize> {
        if !self.has_data() {
            return None;
        }
        let last = self.frame_count - 1;
        self.index = usize::try_from(index.max(0)).map_or(last, |i| i.min(last));
        if self.state == TransportState::Stopped && self.index != 0 {
            self.state = TransportState::Paused;
        }
        Some(self.index)
    }

    /// Relative seek.
    pub fn step(&mut self, delta: i64) -> Option<usize> {
        let current = i64::try_from(self.index).unwrap_or(i64::MAX);
        self.seek(current.saturating_add(delta))
    }

    /// Advance at most one frame. Returns the index to present; the current
    /// index then moves to the next frame, wrapping to 0 after the last.
    pub fn tick(&mut self, now_ms: f64) -> Option<usize> {
        if !self.state.is_playing() {
            return None;
        }
        let clock = self.clock.as_mut()?;
        if !clock.poll(now_ms) {
            return None;
        }
        let shown = self.index;
        self.index = (self.index + 1) % self.frame_count;
        Some(shown)
    }

    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            state: self.state,
            is_playing: self.state.is_playing(),
            current_frame_index: self.index,
            frame_count: self.frame_count,
            fps: self.fps,
            last_tick_ms: self.clock.as_ref().and_then(FrameClock::anchor_ms),
        }
    }

    fn clear_clock(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(frames: usize, fps: f64) -> Transport {
        let mut t = Transport::new();
        t.load(frames, fps);
        t
    }

    #[test]
    fn play_without_data_is_refused() {
        let mut t = Transport::new();
        assert_eq!(t.play(0.0), Err(PlaybackError::NoData));
        assert_eq!(t.state(), TransportState::Paused);
        assert_eq!(t.seek(3), None);
        assert_eq!(t.tick(1000.0), None);
    }

    #[test]
    fn seek_clamps_any_integer() {
        let mut t = loaded(5, 30.0);
        assert_eq!(t.seek(-7), Some(0));
        assert_eq!(t.seek(2), Some(2));
        assert_eq!(t.seek(99), Some(4));
        assert_eq!(t.seek(i64::MAX), Some(4));
        assert_eq!(t.seek(i64::MIN), Some(0));
        assert_eq!(t.step(-1), Some(0));
        assert_eq!(t.seek(4), Some(4));
        assert_eq!(t.step(-1), Some(3));
        assert_eq!(t.step(i64::MAX), Some(4));
    }

    #[test]
    fn seeking_off_frame_zero_leaves_stopped() {
        let mut t = loaded(5, 30.0);
        t.stop();
        assert_eq!(t.seek(0), Some(0));
        assert_eq!(t.state(), TransportState::Stopped);
        assert_eq!(t.step(2), Some(2));
        assert_eq!(t.state(), TransportState::Paused);
    }

    #[test]
    fn tick_wraps_to_start() {
        let mut t = loaded(3, 10.0);
        t.play(0.0).unwrap();
        let shown: Vec<_> = (1..=7).filter_map(|k| t.tick(k as f64 * 101.0)).collect();
        assert_eq!(shown, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(t.index(), 1);
    }

    #[test]
    fn stop_resets_and_pause_keeps_index() {
        let mut t = loaded(4, 10.0);
        t.seek(2);
        t.play(0.0).unwrap();
        t.pause();
        assert_eq!(t.state(), TransportState::Paused);
        assert_eq!(t.index(), 2);
        assert_eq!(t.snapshot().last_tick_ms, None);
        t.stop();
        assert_eq!(t.state(), TransportState::Stopped);
        assert_eq!(t.index(), 0);
        // pausing while stopped stays stopped
        t.pause();
        assert_eq!(t.state(), TransportState::Stopped);
    }

    #[test]
    fn reload_resets_clock_and_rate() {
        let mut t = loaded(4, 10.0);
        t.play(0.0).unwrap();
        t.tick(150.0);
        t.load(8, 60.0);
        let snap = t.snapshot();
        assert_eq!(snap.state, TransportState::Paused);
        assert_eq!(snap.current_frame_index, 0);
        assert_eq!(snap.fps, 60.0);
        assert_eq!(snap.last_tick_ms, None);
    }
}
