use super::Color;

/// A colour pinned to a position along a ramp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Piecewise-linear colour ramp.
///
/// Stops are kept sorted by `t`. Sampling below the first stop or above the last one
/// returns that end stop unchanged; there is no extrapolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Builds a ramp. Returns `None` for fewer than two stops or non-finite positions.
    pub fn new(mut stops: Vec<ColorStop>) -> Option<Self> {
        if stops.len() < 2 || stops.iter().any(|s| !s.t.is_finite() || !s.color.is_finite()) {
            return None;
        }
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Some(Self { stops })
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn sample(&self, t: f32) -> Color {
        self.sample_scaled(t, 1.0)
    }

    /// Samples with every stop position multiplied by `scale`.
    ///
    /// Comparing against scaled stops, rather than dividing `x` down, keeps samples
    /// taken exactly at a scaled stop equal to that stop's colour.
    pub fn sample_scaled(&self, x: f32, scale: f32) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if x.is_nan() || x <= first.t * scale {
            return first.color;
        }
        if x >= last.t * scale {
            return last.color;
        }

        // First stop strictly past `x`; the one before it bounds the segment.
        let hi = self.stops.partition_point(|s| s.t * scale <= x);
        let a = self.stops[hi - 1];
        let b = self.stops[hi];

        let (a_x, b_x) = (a.t * scale, b.t * scale);
        let span = b_x - a_x;
        if span <= 0.0 {
            return b.color;
        }
        a.color.lerp(b.color, (x - a_x) / span)
    }
}
