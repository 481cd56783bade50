//! Latent trait generators
//!
//! Simulation studies draw the "true" trait values once, up front, and never
//! touch them again; these generators make that draw reproducible.
//!
//! Trait values come from the last `ChaCha8` stream of the seed's key.
//! [`ResponseSimulator`](crate::ResponseSimulator) numbers person streams
//! from zero, so one seed can drive both without the draws overlapping.

use irt_core::{Error, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};

/// Stream reserved for trait draws
pub const TRAIT_STREAM: u64 = u64::MAX;

/// Population distribution of the latent trait
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraitDistribution {
    /// Normal with the given mean and standard deviation
    Normal { mean: f64, sd: f64 },
    /// Uniform on `[lo, hi)`
    Uniform { lo: f64, hi: f64 },
    /// Every respondent at the same location
    Constant { value: f64 },
}

impl TraitDistribution {
    pub fn normal(mean: f64, sd: f64) -> Self {
        Self::Normal { mean, sd }
    }

    pub fn uniform(lo: f64, hi: f64) -> Self {
        Self::Uniform { lo, hi }
    }

    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Normal { mean, sd } => {
                if !mean.is_finite() || !sd.is_finite() || sd < 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "normal trait distribution needs finite mean and sd >= 0, got ({mean}, {sd})"
                    )));
                }
            }
            Self::Uniform { lo, hi } => {
                if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                    return Err(Error::InvalidParameter(format!(
                        "uniform trait distribution needs finite lo < hi, got ({lo}, {hi})"
                    )));
                }
            }
            Self::Constant { value } => {
                if !value.is_finite() {
                    return Err(Error::non_finite("constant trait value"));
                }
            }
        }
        Ok(())
    }

    /// Draw `n` trait values from the [`TRAIT_STREAM`] of `seed`
    pub fn generate(&self, n: usize, seed: u64) -> Result<Vec<f64>> {
        self.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(TRAIT_STREAM);
        let values = match *self {
            Self::Normal { mean, sd } => {
                let dist = Normal::new(mean, sd).map_err(|e| {
                    Error::Computation(format!("Failed to create normal distribution: {e}"))
                })?;
                (0..n).map(|_| dist.sample(&mut rng)).collect()
            }
            Self::Uniform { lo, hi } => {
                let dist = Uniform::new(lo, hi);
                (0..n).map(|_| dist.sample(&mut rng)).collect()
            }
            Self::Constant { value } => vec![value; n],
        };
        Ok(values)
    }
}

impl Default for TraitDistribution {
    fn default() -> Self {
        Self::normal(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_draws_are_reproducible() {
        let dist = TraitDistribution::normal(0.57, 1.5);
        let a = dist.generate(500, 7).unwrap();
        let b = dist.generate(500, 7).unwrap();
        assert_eq!(a, b);

        let c = dist.generate(500, 8).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_trait_stream_differs_from_person_streams() {
        let draws = TraitDistribution::uniform(0.0, 1.0).generate(8, 42).unwrap();
        let mut person_zero = ChaCha8Rng::seed_from_u64(42);
        let raw: Vec<f64> = (0..8).map(|_| person_zero.gen::<f64>()).collect();
        assert_ne!(draws, raw);

        let next_seed = TraitDistribution::uniform(0.0, 1.0).generate(8, 43).unwrap();
        assert_ne!(draws, next_seed);
    }

    #[test]
    fn test_normal_moments() {
        let draws = TraitDistribution::normal(0.57, 1.5).generate(20_000, 11).unwrap();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!((mean - 0.57).abs() < 0.05);
        assert!((var.sqrt() - 1.5).abs() < 0.05);
    }

    #[test]
    fn test_uniform_and_constant() {
        let u = TraitDistribution::uniform(-2.0, 2.0).generate(1000, 1).unwrap();
        assert!(u.iter().all(|&x| (-2.0..2.0).contains(&x)));

        let c = TraitDistribution::constant(0.0).generate(3, 1).unwrap();
        assert_eq!(c, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(TraitDistribution::normal(0.0, -1.0).generate(1, 0).is_err());
        assert!(TraitDistribution::uniform(1.0, 1.0).generate(1, 0).is_err());
        assert!(TraitDistribution::constant(f64::NAN).generate(1, 0).is_err());
    }
}
