//! Frame timing utilities
//!
//! The host drives the engine from its own display-refresh callback and hands
//! us plain timestamps, so the clock never reads the wall clock itself. That
//! keeps frame pacing deterministic under test.

/// Fixed-interval frame pacer.
///
/// `tick` reports a frame when a full interval has passed since the schedule
/// point. The overshoot is carried over (`schedule = now - elapsed %
/// interval`) so a late callback does not shift every subsequent frame, while
/// the reported delta is measured against the last *executed* frame.
/// Callers are expected to request their next callback unconditionally,
/// whether or not `tick` returned work to do.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: f64,
    schedule: f64,
    last_frame: f64,
}

impl FrameClock {
    /// Create a clock targeting the given frame rate (frames per second).
    pub fn new(target_fps: f32) -> Self {
        Self {
            interval: 1.0 / f64::from(target_fps.max(1.0)),
            schedule: 0.0,
            last_frame: 0.0,
        }
    }

    /// Target interval between executed frames, in seconds.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Advance the clock to `now` (seconds since an arbitrary epoch).
    ///
    /// Returns `Some(delta)` with the elapsed time since the last executed
    /// frame when a frame is due, `None` when this callback should be skipped.
    /// A callback landing exactly on the interval boundary executes.
    pub fn tick(&mut self, now: f64) -> Option<f32> {
        let elapsed = now - self.schedule;
        if elapsed < self.interval {
            return None;
        }
        let delta = now - self.last_frame;
        self.schedule = now - (elapsed % self.interval);
        self.last_frame = now;
        Some(delta as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_callbacks_inside_the_interval() {
        let mut clock = FrameClock::new(60.0);
        assert!(clock.tick(0.020).is_some());
        // Next callback arrives 5ms later: too early for a 60Hz frame.
        assert!(clock.tick(0.025).is_none());
        assert!(clock.tick(0.040).is_some());
    }

    #[test]
    fn late_frame_carries_remainder() {
        let mut clock = FrameClock::new(50.0); // 20ms interval
        clock.tick(0.020);
        // 30ms late callback: frame runs, but the 10ms overshoot is carried so
        // the following frame is not pushed back a full interval.
        let delta = clock.tick(0.050).expect("frame due");
        assert!((delta - 0.030).abs() < 1e-6);
        assert!(clock.tick(0.0601).is_some());
    }

    #[test]
    fn tick_on_the_exact_interval_executes() {
        let mut clock = FrameClock::new(50.0); // 20ms interval
        let delta = clock.tick(0.020).expect("frame due on the boundary");
        assert!((delta - 0.020).abs() < 1e-6);
    }

    #[test]
    fn delta_measures_from_the_last_executed_frame() {
        let mut clock = FrameClock::new(50.0);
        clock.tick(0.021); // executes; 1ms overshoot carried
        // The carry moves the schedule point, not the delta reference.
        let delta = clock.tick(0.045).expect("frame due");
        assert!((delta - 0.024).abs() < 1e-6);
    }

    #[test]
    fn delta_reflects_skipped_callbacks() {
        let mut clock = FrameClock::new(60.0);
        clock.tick(0.020);
        clock.tick(0.021);
        clock.tick(0.022);
        let delta = clock.tick(0.060).expect("frame due");
        assert!((delta - 0.040).abs() < 1e-6);
    }
}
