use rand::prelude::*;

use crate::constants::{STAR_ANGLE_STEP_DEG, STAR_COUNT, STAR_ROTATION_AMPLITUDE, STAR_SEED, STAR_SPREAD};
use crate::coords::Vec3;

/// Star field with its own motion.
///
/// The angle is owned here and advanced once per tick; rotation and scale are
/// functions of it alone, not of any signal.
#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    angle_deg: f32,
    step_deg: f32,
    points: Vec<Vec3>,
}

impl Default for StarField {
    fn default() -> Self {
        Self::new(STAR_COUNT, STAR_SPREAD, STAR_SEED)
    }
}

impl StarField {
    /// `count` points drawn uniformly from `[-spread, spread)` on each axis.
    pub fn new(count: usize, spread: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut coord = move || rng.r#gen::<f32>() * 2.0 * spread - spread;
        let points = (0..count)
            .map(|_| Vec3::new(coord(), coord(), coord()))
            .collect();

        Self {
            angle_deg: 0.0,
            step_deg: STAR_ANGLE_STEP_DEG,
            points,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn advance(&mut self) {
        self.angle_deg += self.step_deg;
    }

    /// Same angle on all three axes, in radians.
    pub fn rotation(&self) -> Vec3 {
        Vec3::splat(STAR_ROTATION_AMPLITUDE * self.angle_deg.to_radians().sin())
    }

    pub fn scale(&self) -> Vec3 {
        Vec3::splat((2.0 * self.angle_deg).to_radians().cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_seeded_and_bounded() {
        let a = StarField::default();
        let b = StarField::default();
        assert_eq!(a.points().len(), STAR_COUNT);
        assert_eq!(a.points(), b.points());
        for p in a.points() {
            for c in [p.x, p.y, p.z] {
                assert!((-STAR_SPREAD..STAR_SPREAD).contains(&c));
            }
        }
    }

    #[test]
    fn motion_follows_owned_angle() {
        let mut s = StarField::new(4, 1.0, 7);
        assert_eq!(s.rotation(), Vec3::ZERO);
        assert_eq!(s.scale(), Vec3::ONE);

        for _ in 0..100 {
            s.advance();
        }
        assert!((s.angle_deg() - 1.0).abs() < 1e-4);
        let r = STAR_ROTATION_AMPLITUDE * 1.0f32.to_radians().sin();
        assert!((s.rotation().x - r).abs() < 1e-4);
        assert!((s.scale().y - 2.0f32.to_radians().cos()).abs() < 1e-4);
    }
}
