use serde::Deserialize;

/// Spring integration step upper bound, in seconds.
///
/// A frame delta is split into sub-steps no longer than this so the explicit
/// integrator stays stable for stiff springs.
const MAX_SUBSTEP_SEC: f32 = 0.001;

/// Mass-spring-damper parameters.
///
/// Defaults (`stiffness = 170`, `damping = 26`, `mass = 1`) give a damping ratio of
/// about 0.997: close to critical, so overshoot is negligible but not impossible.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,

    /// Distance and speed below which the spring snaps to its target and rests.
    pub precision: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            precision: 0.01,
        }
    }
}

impl SpringConfig {
    /// `damping / (2 * sqrt(stiffness * mass))`; 1.0 is critical damping.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    pub fn is_valid(&self) -> bool {
        [self.stiffness, self.damping, self.mass, self.precision]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Per-signal spring state: up to two components integrated independently.
///
/// `target` is written by the signal source; `current` and `velocity` are only ever
/// written by [`SpringState::step`] (or an explicit jump).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpringState {
    dims: usize,
    current: [f32; 2],
    velocity: [f32; 2],
    target: [f32; 2],
}

impl SpringState {
    pub(crate) fn new(dims: usize, initial: [f32; 2]) -> Self {
        debug_assert!(dims == 1 || dims == 2);
        Self {
            dims,
            current: initial,
            velocity: [0.0; 2],
            target: initial,
        }
    }

    #[inline]
    pub fn current(&self) -> [f32; 2] {
        self.current
    }

    #[inline]
    pub fn target(&self) -> [f32; 2] {
        self.target
    }

    #[inline]
    pub fn velocity(&self) -> [f32; 2] {
        self.velocity
    }

    pub(crate) fn set_target(&mut self, target: [f32; 2]) {
        self.target = target;
    }

    /// Moves current and target together and kills velocity.
    pub(crate) fn jump(&mut self, value: [f32; 2]) {
        self.current = value;
        self.target = value;
        self.velocity = [0.0; 2];
    }

    pub fn is_resting(&self) -> bool {
        (0..self.dims)
            .all(|i| self.current[i] == self.target[i] && self.velocity[i] == 0.0)
    }

    /// Advances the spring by `dt` seconds towards its target.
    pub(crate) fn step(&mut self, cfg: &SpringConfig, dt: f32) {
        if self.is_resting() || dt <= 0.0 {
            return;
        }

        let steps = (dt / MAX_SUBSTEP_SEC).ceil().max(1.0) as u32;
        let h = dt / steps as f32;

        for _ in 0..steps {
            for i in 0..self.dims {
                let displacement = self.current[i] - self.target[i];
                let accel = (-cfg.stiffness * displacement - cfg.damping * self.velocity[i]) / cfg.mass;
                // Semi-implicit Euler: velocity first, then position with the new velocity.
                self.velocity[i] += accel * h;
                self.current[i] += self.velocity[i] * h;
            }
        }

        let settled = (0..self.dims).all(|i| {
            self.velocity[i].abs() < cfg.precision
                && (self.current[i] - self.target[i]).abs() < cfg.precision
        });
        if settled {
            for i in 0..self.dims {
                self.current[i] = self.target[i];
                self.velocity[i] = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut SpringState, cfg: &SpringConfig, seconds: f32) {
        let frames = (seconds * 60.0) as usize;
        for _ in 0..frames {
            state.step(cfg, 1.0 / 60.0);
        }
    }

    #[test]
    fn default_is_near_critical() {
        let r = SpringConfig::default().damping_ratio();
        assert!((r - 1.0).abs() < 0.01, "ratio {r}");
    }

    #[test]
    fn target_change_does_not_move_current() {
        let mut s = SpringState::new(1, [0.0, 0.0]);
        s.set_target([100.0, 0.0]);
        assert_eq!(s.current()[0], 0.0);
    }

    #[test]
    fn converges_and_rests() {
        let cfg = SpringConfig::default();
        let mut s = SpringState::new(1, [0.0, 0.0]);
        s.set_target([500.0, 0.0]);
        run(&mut s, &cfg, 3.0);
        assert_eq!(s.current()[0], 500.0);
        assert!(s.is_resting());
    }

    #[test]
    fn approaches_monotonically_without_visible_overshoot() {
        let cfg = SpringConfig::default();
        let mut s = SpringState::new(1, [0.0, 0.0]);
        s.set_target([100.0, 0.0]);
        let mut prev = 0.0;
        for _ in 0..120 {
            s.step(&cfg, 1.0 / 60.0);
            let cur = s.current()[0];
            assert!(cur >= prev - 1e-3);
            assert!(cur <= 100.0 + 0.5);
            prev = cur;
        }
    }

    #[test]
    fn two_components_move_independently() {
        let cfg = SpringConfig::default();
        let mut s = SpringState::new(2, [0.0, 0.0]);
        s.set_target([10.0, -10.0]);
        s.step(&cfg, 0.05);
        let c = s.current();
        assert!(c[0] > 0.0 && c[1] < 0.0);
        assert!((c[0] + c[1]).abs() < 1e-4);
    }

    #[test]
    fn scalar_spring_ignores_second_lane() {
        let cfg = SpringConfig::default();
        let mut s = SpringState::new(1, [0.0, 0.0]);
        s.set_target([1.0, 99.0]);
        s.step(&cfg, 0.1);
        assert_eq!(s.current()[1], 0.0);
    }

    #[test]
    fn jump_is_immediate() {
        let mut s = SpringState::new(2, [0.0, 0.0]);
        s.jump([3.0, 4.0]);
        assert_eq!(s.current(), [3.0, 4.0]);
        assert!(s.is_resting());
    }
}
