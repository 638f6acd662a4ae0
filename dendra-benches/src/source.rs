//! Synthetic two-dimensional point clouds.

use dendra_core::PointRecord;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Shape of a synthetic dataset.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Number of blob centres the points scatter around.
    pub blobs: usize,
    /// Seed for the deterministic generator.
    pub seed: u64,
}

/// Generates `point_count` points scattered around `blobs` random centres in
/// `[0, 100]²`, each carrying a numeric `weight` attribute.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `point_count` or `blobs` is
/// zero.
pub fn generate_points(config: &SyntheticConfig) -> Result<Vec<PointRecord>, BenchSetupError> {
    if config.point_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "point_count",
        });
    }
    if config.blobs == 0 {
        return Err(BenchSetupError::ZeroValue { context: "blobs" });
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let centres: Vec<(f64, f64)> = (0..config.blobs)
        .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect();
    let points = (0..config.point_count)
        .zip(centres.iter().cycle())
        .map(|(index, &(cx, cy))| {
            // Sum of uniforms approximates a bell curve without a distribution crate.
            let dx: f64 = (0..3).map(|_| rng.gen_range(-2.0_f64..2.0)).sum();
            let dy: f64 = (0..3).map(|_| rng.gen_range(-2.0_f64..2.0)).sum();
            PointRecord::new(format!("p{index}"), cx + dx, cy + dy)
                .with_number("weight", rng.gen_range(0.0..10.0))
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let config = SyntheticConfig {
            point_count: 32,
            blobs: 4,
            seed: 9,
        };
        let first = generate_points(&config).expect("valid config");
        let second = generate_points(&config).expect("valid config");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.iter().all(|point| point.position().is_finite()));
    }

    #[rstest]
    #[case::no_points(0, 3, "point_count")]
    #[case::no_blobs(5, 0, "blobs")]
    fn rejects_zero_sizes(#[case] point_count: usize, #[case] blobs: usize, #[case] field: &str) {
        let err = generate_points(&SyntheticConfig {
            point_count,
            blobs,
            seed: 1,
        })
        .expect_err("zero sizes are rejected");
        assert!(matches!(err, BenchSetupError::ZeroValue { context } if context == field));
    }
}
