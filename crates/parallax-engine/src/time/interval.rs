use std::time::Duration;

/// Fixed-period timer driven by frame time.
///
/// Each whole `period` of accumulated frame time advances `elapsed` by one period,
/// so the elapsed value moves in steps of exactly `period` regardless of frame rate.
/// Feed it unclamped wall time ([`FrameTime::wall`](super::FrameTime::wall)) so the
/// elapsed value keeps up with the clock across stalls. A stopped timer ignores
/// further time.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    accum: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero());
        Self {
            period,
            accum: Duration::ZERO,
            elapsed: Duration::ZERO,
            running: true,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total elapsed time in whole periods.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in milliseconds, the unit the time-driven envelopes use.
    #[inline]
    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed.as_micros() as f32 / 1000.0
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feeds frame time. Returns how many periods fired during this call.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.accum += dt;
        let mut fired = 0;
        while self.accum >= self.period {
            self.accum -= self.period;
            self.elapsed += self.period;
            fired += 1;
        }
        fired
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accum = Duration::ZERO;
    }
}
