use std::time::Duration;

/// A polled countdown advanced by frame time.
///
/// While active it counts `elapsed` up towards `duration`; `update` reports
/// when it runs out. One-shot timers then go idle, repeating timers start
/// the next window straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    elapsed: Duration,
    active: bool,
    repeat: bool,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            active: false,
            repeat: false,
        }
    }

    pub fn repeating(duration: Duration) -> Self {
        Self {
            repeat: true,
            ..Self::new(duration)
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[allow(dead_code)]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change the window. Time already counted in the current window is kept.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `dt`. Returns true if the window ran out during this call.
    pub fn update(&mut self, dt: Duration) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < self.duration {
            return false;
        }

        if self.repeat {
            self.activate();
        } else {
            self.deactivate();
        }
        true
    }
}
