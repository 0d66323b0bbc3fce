//! Semantic events emitted by the player, drained by the host.

use std::collections::VecDeque;

use mimic_pose_core::{InputFormat, SequenceSummary};
use serde::Serialize;

use crate::state::TransportState;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub enum PlaybackEvent {
    /// A new sequence replaced the previous one.
    Loaded {
        summary: SequenceSummary,
        format: InputFormat,
        dropped_frames: usize,
    },
    /// A load failed; the previous sequence stays active.
    LoadRejected {
        category: String,
        message: String,
    },
    StaleLoadDiscarded {
        ticket: u64,
        current: u64,
    },
    StateChanged {
        from: TransportState,
        to: TransportState,
    },
    /// A frame was presented by a tick or a seek.
    FrameChanged {
        index: usize,
    },
    /// A frame could not be solved, so nothing was applied for it.
    FrameSkipped {
        index: usize,
        reason: String,
    },
    /// A medium position sync. `written` is false when no medium is bound or
    /// it was not ready.
    MediaSynced {
        seconds: f64,
        written: bool,
    },
    /// Human-readable status line.
    Status {
        message: String,
    },
}

/// Bounded FIFO; pushing past the cap drops the oldest event.
#[derive(Debug)]
pub struct EventBuffer {
    events: VecDeque<PlaybackEvent>,
    cap: usize,
    dropped: usize,
}

impl EventBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(cap.min(64)),
            cap,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: PlaybackEvent) {
        if self.cap == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() == self.cap {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<PlaybackEvent> {
        self.events.drain(..).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded to stay under the cap since construction.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_events_fall_off() {
        let mut buf = EventBuffer::new(2);
        for index in 0..5 {
            buf.push(PlaybackEvent::FrameChanged { index });
        }
        assert_eq!(buf.dropped(), 3);
        assert_eq!(
            buf.drain(),
            vec![
                PlaybackEvent::FrameChanged { index: 3 },
                PlaybackEvent::FrameChanged { index: 4 }
            ]
        );
        assert!(buf.is_empty());
    }
}
