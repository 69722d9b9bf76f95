//! 2D gradient (Perlin) noise with a lazily filled gradient lattice.
//!
//! Every integer lattice point owns a unit gradient. Gradients are created on
//! first use and stored for the lifetime of the field, so repeated samples at
//! the same coordinate always agree.

use std::collections::HashMap;
use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces the gradient for a lattice point the first time it is needed
pub trait GradientSource {
    fn gradient(&mut self, ix: i32, iy: i32) -> Vec2;
}

/// Uniformly distributed unit gradients, one per `(seed, ix, iy)`
///
/// Each cell seeds its own RNG, so a gradient does not depend on the order
/// in which cells are first queried.
pub struct RandomGradients {
    seed: u64,
}

impl RandomGradients {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Mix the seed and cell coordinates into a per-cell RNG seed
    fn cell_seed(&self, ix: i32, iy: i32) -> u64 {
        let cell = ((ix as u32 as u64) << 32) | iy as u32 as u64;
        let mut z = self.seed ^ cell.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl GradientSource for RandomGradients {
    fn gradient(&mut self, ix: i32, iy: i32) -> Vec2 {
        let mut rng = StdRng::seed_from_u64(self.cell_seed(ix, iy));
        let angle = rng.gen::<f32>() * TAU;
        Vec2::new(angle.cos(), angle.sin())
    }
}

/// Gradient noise field over the plane
pub struct NoiseField<G = RandomGradients> {
    source: G,
    gradients: HashMap<(i32, i32), Vec2>,
}

impl NoiseField<RandomGradients> {
    /// Create a field whose gradients are drawn from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(RandomGradients::new(seed))
    }
}

impl<G: GradientSource> NoiseField<G> {
    pub fn with_source(source: G) -> Self {
        Self {
            source,
            gradients: HashMap::new(),
        }
    }

    /// Gradient at a lattice point, created and cached on first lookup
    pub fn gradient(&mut self, ix: i32, iy: i32) -> Vec2 {
        let source = &mut self.source;
        *self
            .gradients
            .entry((ix, iy))
            .or_insert_with(|| source.gradient(ix, iy))
    }

    /// Number of lattice points that have a gradient assigned
    pub fn cached_gradients(&self) -> usize {
        self.gradients.len()
    }

    /// Sample the field at `(x, y)`
    ///
    /// Returns exactly zero on lattice points; values stay roughly in [-1, 1].
    pub fn noise(&mut self, x: f32, y: f32) -> f32 {
        let x0 = x.floor();
        let y0 = y.floor();
        let x1 = x0 + 1.0;
        let y1 = y0 + 1.0;

        let sx = fade(x - x0);
        let sy = fade(y - y0);

        let n0 = self.dot_grid_gradient(x0, y0, x, y);
        let n1 = self.dot_grid_gradient(x1, y0, x, y);
        let ix0 = lerp(n0, n1, sx);

        let n2 = self.dot_grid_gradient(x0, y1, x, y);
        let n3 = self.dot_grid_gradient(x1, y1, x, y);
        let ix1 = lerp(n2, n3, sx);

        lerp(ix0, ix1, sy)
    }

    /// Contribution of one lattice corner to the sample at `(x, y)`
    fn dot_grid_gradient(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> f32 {
        let gradient = self.gradient(cx as i32, cy as i32);
        Vec2::new(x - cx, y - cy).dot(gradient)
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(Vec2);

    impl GradientSource for Constant {
        fn gradient(&mut self, _ix: i32, _iy: i32) -> Vec2 {
            self.0
        }
    }

    #[test]
    fn test_noise_is_zero_on_lattice() {
        let mut field = NoiseField::seeded(7);
        for ix in -5..5 {
            for iy in -5..5 {
                let value = field.noise(ix as f32, iy as f32);
                assert!(value.abs() < 1e-6, "noise({ix}, {iy}) = {value}");
            }
        }
    }

    #[test]
    fn test_fade_endpoints_and_monotonic() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-7);

        let mut previous = fade(0.0);
        for i in 1..=100 {
            let current = fade(i as f32 / 100.0);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_gradient_cache_is_stable() {
        let mut field = NoiseField::seeded(3);
        let first = field.gradient(4, -2);
        field.noise(10.3, -7.8);
        let second = field.gradient(4, -2);

        assert_eq!(first, second);
        assert!((first.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_seeded_fields_ignore_query_order() {
        let mut a = NoiseField::seeded(7);
        let mut b = NoiseField::seeded(7);
        b.noise(10.5, 10.5);
        b.noise(-4.2, 3.3);

        assert_eq!(a.noise(0.5, 0.5), b.noise(0.5, 0.5));
        assert_eq!(a.gradient(11, 10), b.gradient(11, 10));
        assert_eq!(a.gradient(-5, 3), b.gradient(-5, 3));
    }

    #[test]
    fn test_seeds_change_gradients() {
        let mut a = NoiseField::seeded(1);
        let mut b = NoiseField::seeded(2);
        let differing = (0..8).filter(|&i| a.gradient(i, -i) != b.gradient(i, -i)).count();
        assert!(differing > 0);
    }

    #[test]
    fn test_repeated_samples_agree() {
        let mut field = NoiseField::seeded(11);
        let a = field.noise(3.7, 1.2);
        let cached = field.cached_gradients();
        let b = field.noise(3.7, 1.2);

        assert_eq!(a, b);
        assert_eq!(field.cached_gradients(), cached);
    }

    #[test]
    fn test_noise_is_continuous_across_cells() {
        let mut field = NoiseField::seeded(5);
        let eps = 1e-3;
        for i in 0..50 {
            let x = -3.0 + i as f32 * 0.137;
            let y = 0.5 + i as f32 * 0.071;
            let delta = (field.noise(x + eps, y) - field.noise(x, y)).abs();
            assert!(delta < 0.01, "jump of {delta} at ({x}, {y})");
        }

        // Straddle an integer boundary
        let left = field.noise(2.0 - eps, 0.4);
        let right = field.noise(2.0 + eps, 0.4);
        assert!((left - right).abs() < 0.01);
    }

    #[test]
    fn test_constant_gradient_values() {
        let mut field = NoiseField::with_source(Constant(Vec2::X));

        // With every gradient (1, 0) the field reduces to fx - fade(fx)
        assert!((field.noise(0.25, 0.0) - 0.146_484_38).abs() < 1e-6);
        assert!((field.noise(-0.25, 0.0) + 0.146_484_38).abs() < 1e-6);
        assert!(field.noise(0.5, 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_values_stay_near_unit_range() {
        let mut field = NoiseField::seeded(99);
        for i in 0..400 {
            let x = (i % 20) as f32 * 0.31;
            let y = (i / 20) as f32 * 0.47;
            assert!(field.noise(x, y).abs() <= 1.0);
        }
    }
}
