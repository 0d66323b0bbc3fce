//! Fixed-interval frame pacing against a host-supplied millisecond clock.
//!
//! The clock keeps an anchor timestamp. A poll that finds more than one
//! interval elapsed advances by exactly one frame and moves the anchor to
//! `now - (elapsed % interval)`, so leftover time carries into the next frame
//! and the long-run frame rate does not drift with tick jitter. Ticks that
//! arrive late never advance more than one frame.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
    interval_ms: f64,
    anchor_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / fps,
            anchor_ms: None,
        }
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    #[inline]
    pub fn anchor_ms(&self) -> Option<f64> {
        self.anchor_ms
    }

    /// Start measuring from `now_ms`.
    #[inline]
    pub fn arm(&mut self, now_ms: f64) {
        self.anchor_ms = Some(now_ms);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.anchor_ms = None;
    }

    /// Returns true when a frame is due. An unset anchor is armed at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        let anchor = match self.anchor_ms {
            Some(anchor) => anchor,
            None => {
                self.anchor_ms = Some(now_ms);
                return false;
            }
        };
        let elapsed = now_ms - anchor;
        if elapsed < 0.0 {
            // host clock went backwards; measure from here
            self.anchor_ms = Some(now_ms);
            return false;
        }
        if elapsed > self.interval_ms {
            self.anchor_ms = Some(now_ms - elapsed % self.interval_ms);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_only_arms() {
        let mut clock = FrameClock::new(10.0);
        assert!(!clock.poll(500.0));
        assert_eq!(clock.anchor_ms(), Some(500.0));
    }

    #[test]
    fn remainder_carries_over() {
        let mut clock = FrameClock::new(10.0);
        clock.arm(0.0);
        assert!(!clock.poll(100.0)); // exactly one interval is not enough
        assert!(clock.poll(130.0));
        assert_eq!(clock.anchor_ms(), Some(100.0));
        assert!(clock.poll(205.0));
        assert_eq!(clock.anchor_ms(), Some(200.0));
    }

    #[test]
    fn late_tick_advances_once() {
        let mut clock = FrameClock::new(10.0);
        clock.arm(0.0);
        assert!(clock.poll(350.0));
        assert_eq!(clock.anchor_ms(), Some(300.0));
        assert!(!clock.poll(360.0));
    }

    #[test]
    fn backwards_time_rearms() {
        let mut clock = FrameClock::new(10.0);
        clock.arm(1000.0);
        assert!(!clock.poll(10.0));
        assert_eq!(clock.anchor_ms(), Some(10.0));
    }
}
