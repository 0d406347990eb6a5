use crate::game::config::{ms_to_ticks, MS_PER_TICK};

/// Converts host frame timestamps into logic ticks (60 per second).
///
/// The first frame after `rebase` only records a baseline, so wall time spent
/// paused or stopped never reaches the simulation.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_frame_ms: Option<f64>,
    elapsed_ticks: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock::default()
    }

    /// Ticks simulated since the session started.
    pub fn elapsed_ticks(&self) -> f64 {
        self.elapsed_ticks
    }

    /// Forget the last timestamp; the next frame restarts the delta.
    pub fn rebase(&mut self) {
        self.last_frame_ms = None;
    }

    /// Tick delta for a frame at `now_ms`, clamped to `[0, max_frame_ms]`.
    pub fn frame(&mut self, now_ms: f64, max_frame_ms: f64) -> f64 {
        let delta_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, max_frame_ms),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        ms_to_ticks(delta_ms)
    }

    /// Advance the monotonic tick counter.
    pub fn accumulate(&mut self, delta_ticks: f64) {
        self.elapsed_ticks += delta_ticks.max(0.0);
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ticks * MS_PER_TICK
    }

    pub fn reset(&mut self) {
        *self = FrameClock::default();
    }
}
