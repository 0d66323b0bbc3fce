//! Independent time base kept in step with playback (typically a video).

/// A medium whose playback position follows the current frame.
pub trait TimeMedium {
    /// Whether the medium can accept position writes yet.
    fn is_ready(&self) -> bool {
        true
    }

    fn set_current_time(&mut self, seconds: f64);
}

/// In-memory medium for headless hosts and tests. Records every write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManualMedium {
    pub ready: bool,
    pub current_time: f64,
    pub writes: Vec<f64>,
}

impl ManualMedium {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }
}

impl TimeMedium for ManualMedium {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        self.writes.push(seconds);
    }
}
