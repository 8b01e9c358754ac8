use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds, after clamping.
    pub dt: f32,

    /// Unclamped wall time since the previous tick.
    pub wall: Duration,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimised window does not hand the
/// springs one enormous step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock clamping deltas to `[100µs, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the window was suspended.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock against the wall clock.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.emit(dt, now)
    }

    /// Advances the clock by a caller-supplied delta.
    ///
    /// Used by headless drivers and tests that step frames deterministically.
    pub fn advance(&mut self, dt: Duration) -> FrameTime {
        let now = self.last + dt;
        self.last = now;
        self.emit(dt, now)
    }

    fn emit(&mut self, wall: Duration, now: Instant) -> FrameTime {
        let dt = wall.clamp(self.dt_min, self.dt_max);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            wall,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
