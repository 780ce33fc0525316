//! The background star cloud.
//!
//! A single point-cloud entity generated once at mount: a fixed number of
//! points scattered uniformly inside a cube around the origin. Individual
//! stars never move; the whole cloud accumulates a slow rotation each tick.

use glam::{EulerRot, Mat4};
use rand::Rng;

/// Number of stars in the cloud.
pub const STAR_COUNT: usize = 2000;

/// Half-width of the cube the stars are scattered in, per axis.
pub const FIELD_HALF_WIDTH: f32 = 50.0;

/// Per-tick rotation increments, radians.
pub const SPIN_Y: f32 = 0.0002;
pub const SPIN_X: f32 = 0.0001;

pub struct StarField {
    positions: Vec<[f32; 3]>,
    rotation_x: f32,
    rotation_y: f32,
}

impl StarField {
    /// Scatter [`STAR_COUNT`] stars uniformly in the field cube.
    pub fn generate() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng>(rng: &mut R) -> Self {
        let positions = (0..STAR_COUNT)
            .map(|_| {
                [
                    rng.gen_range(-FIELD_HALF_WIDTH..=FIELD_HALF_WIDTH),
                    rng.gen_range(-FIELD_HALF_WIDTH..=FIELD_HALF_WIDTH),
                    rng.gen_range(-FIELD_HALF_WIDTH..=FIELD_HALF_WIDTH),
                ]
            })
            .collect();

        Self {
            positions,
            rotation_x: 0.0,
            rotation_y: 0.0,
        }
    }

    /// Advance the cloud's rotation by one tick. Accumulates monotonically;
    /// never reset while the scene is mounted.
    pub fn spin(&mut self) {
        self.rotation_y += SPIN_Y;
        self.rotation_x += SPIN_X;
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Model matrix applying the accumulated cloud rotation.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation_x, self.rotation_y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_bounds_are_invariant() {
        let stars = StarField::generate();
        assert_eq!(stars.positions().len(), STAR_COUNT);
        for p in stars.positions() {
            for &c in p {
                assert!((-FIELD_HALF_WIDTH..=FIELD_HALF_WIDTH).contains(&c));
            }
        }
    }

    #[test]
    fn regeneration_changes_content_not_shape() {
        let a = StarField::generate();
        let b = StarField::generate();
        assert_eq!(a.positions().len(), b.positions().len());
        // 6000 independent uniform draws colliding is not going to happen.
        assert_ne!(a.positions(), b.positions());
    }

    #[test]
    fn spin_accumulates_fixed_increments() {
        let mut stars = StarField::generate();
        for _ in 0..10 {
            stars.spin();
        }
        assert!((stars.rotation_y() - 10.0 * SPIN_Y).abs() < 1e-7);
        assert!((stars.rotation_x() - 10.0 * SPIN_X).abs() < 1e-7);
    }
}
