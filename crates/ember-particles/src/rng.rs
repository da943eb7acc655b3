//! Seedable random source owned by each emitter

use ember_core::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source for emission sampling.
///
/// Every emitter owns one; there is no process-wide generator. Seed it with
/// [`ParticleRng::new`] for reproducible runs.
pub struct ParticleRng {
    inner: StdRng,
}

impl ParticleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy, for interactive use
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    /// Returns a float in [min, max]. A collapsed range returns `min`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    /// Each axis drawn independently from `[-extent_i, +extent_i]`
    pub fn symmetric(&mut self, extent: Vec3) -> Vec3 {
        Vec3::new(
            self.range(-extent.x, extent.x),
            self.range(-extent.y, extent.y),
            self.range(-extent.z, extent.z),
        )
    }

    /// Uniform point in the axis-aligned box `center ± half_extent`
    pub fn in_box(&mut self, center: Vec3, half_extent: Vec3) -> Vec3 {
        center + self.symmetric(half_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(-10.0, 10.0);
            assert!((-10.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn collapsed_range_returns_min() {
        let mut rng = ParticleRng::new(7);
        assert_eq!(rng.range(3.0, 3.0), 3.0);
        assert_eq!(rng.symmetric(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ParticleRng::new(99);
        let mut b = ParticleRng::new(99);
        for _ in 0..32 {
            assert_eq!(a.range(0.0, 1.0), b.range(0.0, 1.0));
        }
    }

    #[test]
    fn in_box_stays_inside() {
        let mut rng = ParticleRng::new(123);
        let center = Vec3::new(0.0, 500.0, 0.0);
        let half = Vec3::new(1000.0, 0.0, 1000.0);
        for _ in 0..500 {
            let p = rng.in_box(center, half);
            assert!(p.x.abs() <= 1000.0);
            assert_eq!(p.y, 500.0);
            assert!(p.z.abs() <= 1000.0);
        }
    }
}
