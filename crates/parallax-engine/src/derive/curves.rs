//! Pure mapping curves used by the scene's derivations.
//!
//! Everything here is a plain function of already-smoothed values. Units follow
//! [`crate::constants`]: scroll and pointer in logical pixels, time in milliseconds.

use crate::constants::*;
use crate::coords::{Vec2, Vec3};
use crate::paint::{Color, ColorRamp, ColorStop};

/// Static placement of a parallax layer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerAnchor {
    pub x: f32,
    pub y: f32,
    pub factor: f32,
    pub z: f32,
}

/// Visible scroll range for a viewport height.
#[inline]
pub fn scroll_max(viewport_height: f32) -> f32 {
    viewport_height * SCROLL_MAX_SCREENS
}

/// Vertical scene position of a layer before any depth handling.
///
/// Combines pointer parallax, the stretched static `y` and a scroll term normalised
/// by `scroll_max`. A zero range yields a non-finite result, which the graph rejects.
pub fn effective_y(anchor: LayerAnchor, pointer_y: f32, scroll_top: f32, scroll_max: f32) -> f32 {
    pointer_y * anchor.factor / PARALLAX_POINTER_DIVISOR
        + anchor.y * PARALLAX_Y_STRETCH
        + (scroll_top * anchor.factor / scroll_max) * PARALLAX_SCROLL_GAIN
}

/// Position of an image layer. X moves against the pointer; Z drifts forward with scroll.
pub fn parallax_position(anchor: LayerAnchor, pointer: Vec2, scroll_top: f32, scroll_max: f32) -> Vec3 {
    Vec3::new(
        -pointer.x * anchor.factor / PARALLAX_POINTER_DIVISOR + anchor.x,
        effective_y(anchor, pointer.y, scroll_top, scroll_max),
        anchor.z + scroll_top / IMAGE_DEPTH_DIVISOR,
    )
}

/// 0 at `x <= 0`, 1 at `x >= span`, linear between.
pub fn fade_in(x: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return if x > 0.0 { 1.0 } else { 0.0 };
    }
    (x / span).clamp(0.0, 1.0)
}

/// Mirror of [`fade_in`]: 1 at `x <= 0`, 0 at `x >= span`.
#[inline]
pub fn fade_out(x: f32, span: f32) -> f32 {
    1.0 - fade_in(x, span)
}

/// Distance-to-visibility falloff for message layers: `clamp(2 - |y|, 0, upper)`.
pub fn visibility(effective_y: f32, upper: f32) -> f32 {
    (MESSAGE_VISIBILITY_RADIUS - effective_y.abs()).clamp(0.0, upper.max(0.0))
}

/// Message depth follows the same falloff but is floored at -2 instead of 0.
pub fn message_depth(effective_y: f32) -> f32 {
    (MESSAGE_VISIBILITY_RADIUS - effective_y.abs()).max(MESSAGE_DEPTH_MIN)
}

pub fn message_position(anchor: LayerAnchor, pointer: Vec2, scroll_top: f32, scroll_max: f32) -> Vec3 {
    let y = effective_y(anchor, pointer.y, scroll_top, scroll_max);
    Vec3::new(0.0, y, message_depth(y))
}

/// `base` moved up by `scroll_top / divisor`.
#[inline]
pub fn drift(base: Vec3, scroll_top: f32, divisor: f32) -> Vec3 {
    Vec3::new(base.x, base.y + scroll_top / divisor, base.z)
}

pub fn spotlight_position(pointer: Vec2) -> Vec3 {
    Vec3::new(
        pointer.x / LIGHT_POINTER_DIVISOR,
        -pointer.y / LIGHT_POINTER_DIVISOR,
        LIGHT_Z,
    )
}

/// One-shot triangle pulse on the elapsed-time axis.
///
/// Dormant before `start_ms`, rises at `rate_per_ms` for `ramp_ms`, falls back to
/// zero over the next `ramp_ms`, then stays dormant. Any scroll past `scroll_gate`
/// forces it dormant at sample time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PulseEnvelope {
    pub start_ms: f32,
    pub ramp_ms: f32,
    pub rate_per_ms: f32,
    pub scroll_gate: f32,
}

impl Default for PulseEnvelope {
    fn default() -> Self {
        Self {
            start_ms: GLITCH_START_MS,
            ramp_ms: GLITCH_RAMP_MS,
            rate_per_ms: GLITCH_RATE_PER_MS,
            scroll_gate: GLITCH_SCROLL_GATE,
        }
    }
}

impl PulseEnvelope {
    #[inline]
    pub fn peak(&self) -> f32 {
        self.ramp_ms * self.rate_per_ms
    }

    pub fn sample(&self, elapsed_ms: f32, scroll_top: f32) -> f32 {
        if elapsed_ms < self.start_ms || scroll_top > self.scroll_gate {
            return 0.0;
        }

        let t = elapsed_ms - self.start_ms;
        if t < self.ramp_ms {
            t * self.rate_per_ms
        } else if t < 2.0 * self.ramp_ms {
            (self.peak() - (t - self.ramp_ms) * self.rate_per_ms).max(0.0)
        } else {
            0.0
        }
    }
}

/// Breathing alpha for the hint label.
///
/// Dormant before `start_ms`, fades in over `fade_ms`, then alternates falling and
/// rising ramps of `half_period_ms` each. The ramp direction comes from the
/// half-period count within `outer_period_ms`, so the wave repeats every
/// `2 * half_period_ms` as long as the outer period is a whole multiple of that.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlinkEnvelope {
    pub start_ms: f32,
    pub fade_ms: f32,
    pub half_period_ms: f32,
    pub outer_period_ms: f32,
    pub scroll_gate: f32,
}

impl Default for BlinkEnvelope {
    fn default() -> Self {
        Self {
            start_ms: BLINK_START_MS,
            fade_ms: BLINK_FADE_MS,
            half_period_ms: BLINK_HALF_PERIOD_MS,
            outer_period_ms: BLINK_OUTER_PERIOD_MS,
            scroll_gate: BLINK_SCROLL_GATE,
        }
    }
}

impl BlinkEnvelope {
    #[inline]
    pub fn period(&self) -> f32 {
        2.0 * self.half_period_ms
    }

    pub fn sample(&self, elapsed_ms: f32, scroll_top: f32) -> f32 {
        if elapsed_ms < self.start_ms || scroll_top > self.scroll_gate {
            return 0.0;
        }
        if elapsed_ms < self.start_ms + self.fade_ms {
            return (elapsed_ms - self.start_ms) / self.fade_ms;
        }

        let within = elapsed_ms.rem_euclid(self.half_period_ms) / self.half_period_ms;
        let half = (elapsed_ms.rem_euclid(self.outer_period_ms) / self.half_period_ms).floor() as i64;
        if half % 2 == 0 { 1.0 - within } else { within }
    }
}

/// Background ramp with stop positions as fractions of the scroll range.
///
/// Returns `None` only if a stop colour fails to parse.
pub fn background_ramp() -> Option<ColorRamp> {
    let stops = BACKGROUND_STOPS
        .iter()
        .map(|&(t, hex)| Color::from_hex(hex).map(|c| ColorStop::new(t, c)))
        .collect::<Option<Vec<_>>>()?;
    ColorRamp::new(stops)
}

#[inline]
pub fn background_color(ramp: &ColorRamp, scroll_top: f32, scroll_max: f32) -> Color {
    ramp.sample_scaled(scroll_top, scroll_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: LayerAnchor = LayerAnchor {
        x: 0.0,
        y: -16.0,
        factor: 10.0,
        z: 0.0,
    };

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── parallax ──────────────────────────────────────────────────────────

    #[test]
    fn primary_layer_at_rest() {
        let p = parallax_position(PRIMARY, Vec2::zero(), 0.0, 2700.0);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, -16.0 * 1.15));
        assert!(close(p.z, 0.0));
    }

    #[test]
    fn pointer_moves_layer_against_x_and_with_y() {
        let p = parallax_position(PRIMARY, Vec2::new(500.0, 500.0), 0.0, 2700.0);
        assert!(close(p.x, -0.1));
        assert!(close(p.y, -16.0 * 1.15 + 0.1));
    }

    #[test]
    fn scroll_raises_and_drifts_forward() {
        let max = 2700.0;
        let p = parallax_position(PRIMARY, Vec2::zero(), max, max);
        assert!(close(p.y, -16.0 * 1.15 + 20.0));
        assert!(close(p.z, max / 2000.0));
    }

    #[test]
    fn zero_scroll_range_is_not_finite() {
        assert!(!effective_y(PRIMARY, 0.0, 10.0, 0.0).is_finite());
    }

    // ── envelopes ─────────────────────────────────────────────────────────

    #[test]
    fn fade_in_is_monotone_and_bounded() {
        let mut prev = fade_in(0.0, IMAGE_FADE_IN_SPAN);
        for i in 0..=2700 {
            let v = fade_in(i as f32, IMAGE_FADE_IN_SPAN);
            assert!((0.0..=1.0).contains(&v));
            assert!(v >= prev);
            prev = v;
        }
        assert_eq!(fade_in(500.0, IMAGE_FADE_IN_SPAN), 1.0);
        assert_eq!(fade_in(-50.0, IMAGE_FADE_IN_SPAN), 0.0);
    }

    #[test]
    fn fade_out_mirrors_fade_in() {
        assert_eq!(fade_out(0.0, 200.0), 1.0);
        assert_eq!(fade_out(100.0, 200.0), 0.5);
        assert_eq!(fade_out(400.0, 200.0), 0.0);
    }

    #[test]
    fn visibility_falloff() {
        assert_eq!(visibility(0.0, 1.0), 1.0);
        assert_eq!(visibility(0.0, 5.0), 2.0);
        assert_eq!(visibility(1.5, 1.0), 0.5);
        assert_eq!(visibility(-1.5, 1.0), 0.5);
        for y in [2.0, -2.0, 3.0, -40.0] {
            assert_eq!(visibility(y, 1.0), 0.0);
        }
    }

    #[test]
    fn message_depth_is_floored() {
        assert_eq!(message_depth(0.0), 2.0);
        assert_eq!(message_depth(3.0), -1.0);
        assert_eq!(message_depth(-20.0), -2.0);
    }

    #[test]
    fn pulse_phases() {
        let p = PulseEnvelope::default();
        assert_eq!(p.sample(0.0, 0.0), 0.0);
        assert_eq!(p.sample(1_999.0, 0.0), 0.0);
        assert_eq!(p.sample(2_000.0, 0.0), 0.0);

        let mut prev = 0.0;
        for t in (2_100..4_000).step_by(100) {
            let v = p.sample(t as f32, 0.0);
            assert!(v > prev);
            prev = v;
        }
        for t in (4_000..6_000).step_by(100) {
            let v = p.sample(t as f32, 0.0);
            assert!(v < prev || (t == 4_000 && v <= p.peak()));
            prev = v;
        }
        assert_eq!(p.sample(6_000.0, 0.0), 0.0);
        assert_eq!(p.sample(60_000.0, 0.0), 0.0);
    }

    #[test]
    fn pulse_is_preempted_by_scroll() {
        let p = PulseEnvelope::default();
        assert!(p.sample(3_000.0, 200.0) > 0.0);
        assert_eq!(p.sample(3_000.0, 200.5), 0.0);
        assert_eq!(p.sample(4_500.0, 1_000.0), 0.0);
    }

    #[test]
    fn blink_is_dormant_then_fades_in() {
        let b = BlinkEnvelope::default();
        assert_eq!(b.sample(3_900.0, 0.0), 0.0);
        assert_eq!(b.sample(4_000.0, 0.0), 0.0);
        assert_eq!(b.sample(5_000.0, 0.0), 0.5);
        assert_eq!(b.sample(6_000.0, 0.0), 1.0);
        assert_eq!(b.sample(6_500.0, 0.0), 0.5);
        assert_eq!(b.sample(7_500.0, 0.0), 0.5);
    }

    #[test]
    fn blink_is_periodic_after_fade() {
        let b = BlinkEnvelope::default();
        let period = b.period();
        for t in (6_000..30_000).step_by(100) {
            let t = t as f32;
            assert!(close(b.sample(t, 0.0), b.sample(t + period, 0.0)), "t = {t}");
        }
    }

    #[test]
    fn blink_is_gated_by_scroll() {
        let b = BlinkEnvelope::default();
        for t in (0..30_000).step_by(100) {
            assert_eq!(b.sample(t as f32, 201.0), 0.0);
        }
    }

    // ── background ────────────────────────────────────────────────────────

    #[test]
    fn background_hits_stops_at_breakpoints() {
        let ramp = background_ramp().unwrap();
        let max = scroll_max(600.0);
        for (t, hex) in BACKGROUND_STOPS {
            let expected = Color::from_hex(hex).unwrap();
            assert_eq!(background_color(&ramp, t * max, max), expected);
        }
    }

    #[test]
    fn background_between_stops_stays_within_bounds() {
        let ramp = background_ramp().unwrap();
        let max = scroll_max(600.0);
        let a = Color::from_hex(BACKGROUND_STOPS[1].1).unwrap();
        let b = Color::from_hex(BACKGROUND_STOPS[2].1).unwrap();
        let c = background_color(&ramp, 0.5 * max, max);
        for (x, lo, hi) in [(c.r, a.r, b.r), (c.g, a.g, b.g), (c.b, a.b, b.b)] {
            assert!(x >= lo.min(hi) && x <= lo.max(hi));
        }
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    // ── light ─────────────────────────────────────────────────────────────

    #[test]
    fn spotlight_follows_pointer() {
        let p = spotlight_position(Vec2::new(200.0, 100.0));
        assert_eq!(p, Vec3::new(2.0, -1.0, 6.5));
    }
}
