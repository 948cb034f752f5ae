//! Coherent-noise building mask.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::constants::{BUILDING_NOISE_FREQUENCY, BUILDING_NOISE_THRESHOLD};

/// Seeded 2D coherent noise field used as the building-density mask.
///
/// The sample frequency is baked in, so callers pass raw world coordinates.
pub struct NoiseField {
    noise: FastNoiseLite,
    pub seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(BUILDING_NOISE_FREQUENCY));
        NoiseField { noise, seed }
    }

    /// Noise value in [-1, 1] at the given world coordinates.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z)
    }

    /// Whether a candidate cell at (x, z) is eligible for a building.
    pub fn is_building_site(&self, x: f32, z: f32) -> bool {
        self.sample(x, z) > BUILDING_NOISE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_per_seed() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        let c = NoiseField::new(43);

        let mut differs = false;
        for i in 0..100 {
            let x = i as f32 * 17.3;
            let z = i as f32 * -9.1;
            assert_eq!(a.sample(x, z), b.sample(x, z));
            if a.sample(x, z) != c.sample(x, z) {
                differs = true;
            }
        }
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_range() {
        let field = NoiseField::new(7);
        for i in -200..200 {
            let v = field.sample(i as f32 * 13.7, i as f32 * 5.1);
            assert!((-1.0..=1.0).contains(&v), "sample out of range: {}", v);
        }
    }

    #[test]
    fn test_continuity() {
        // Gradient noise: nearby inputs give nearby outputs.
        let field = NoiseField::new(7);
        for i in 0..500 {
            let x = i as f32 * 3.7;
            let z = i as f32 * 1.9;
            let delta = (field.sample(x, z) - field.sample(x + 0.5, z)).abs();
            assert!(delta < 0.1, "discontinuity of {} at ({}, {})", delta, x, z);
        }
    }

    #[test]
    fn test_threshold_selects_a_minority_of_cells() {
        let field = NoiseField::new(2147);
        let mut eligible = 0usize;
        let mut total = 0usize;
        for ix in -100..100 {
            for iz in -100..100 {
                total += 1;
                if field.is_building_site(ix as f32 * 20.0, iz as f32 * 20.0) {
                    eligible += 1;
                }
            }
        }
        let coverage = eligible as f32 / total as f32;
        assert!(
            coverage > 0.05 && coverage < 0.5,
            "coverage {} outside expected band",
            coverage
        );
    }
}
