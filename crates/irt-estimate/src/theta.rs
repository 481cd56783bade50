//! Theta estimation by weighted likelihood
//!
//! Warm's (1989) weighted likelihood estimate solves
//!
//! ```text
//! score(θ) + J(θ) / (2·I(θ)) = 0,   J(θ) = Σ_i Σ_k P'_ik P''_ik / P_ik
//! ```
//!
//! For the Partial Credit Model `J` is the summed third central moment of the
//! category index, which [`SurfacePoint`] already carries. The equation is
//! solved by Newton's method kept inside a sign-change bracket: any step that
//! would leave the bracket, or that uses a non-negative slope, is replaced by
//! bisection, so the search always terminates inside the range.
//!
//! Patterns whose every observed response is at the lowest (highest)
//! category are placed on the lower (upper) end of the range instead of
//! being solved, and reported with [`EstimateStatus::Extreme`].

use crate::config::{EstimationMethod, EstimatorConfig};
use crate::types::{Bound, EstimateStatus, ThetaSolution};
use irt_core::{Error, Extreme, ItemSet, PatternLikelihood, ResponsePattern, Result, SurfacePoint};
use tracing::trace;

/// Root finder for the trait estimating equation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThetaEstimator {
    config: EstimatorConfig,
}

impl ThetaEstimator {
    /// Create an estimator; fails on an unusable configuration
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Value and slope of the estimating function at a surface point
    fn equation(&self, point: &SurfacePoint) -> (f64, f64) {
        match self.config.method {
            EstimationMethod::WeightedLikelihood => {
                (point.weighted_score(), -point.weighted_information())
            }
            EstimationMethod::MaximumLikelihood => (point.score, -point.information),
        }
    }

    /// Estimate theta, placing degenerate patterns on the range ends
    pub fn estimate(&self, items: &ItemSet, pattern: &ResponsePattern) -> Result<ThetaSolution> {
        let lik = PatternLikelihood::new(items, pattern)?;
        if pattern.n_observed() == 0 {
            return Err(Error::InvalidInput(
                "response pattern has no observed responses".to_string(),
            ));
        }

        let (lo, hi) = self.config.range;
        if let Some(extreme) = pattern.extreme(items) {
            let theta = match extreme {
                Extreme::Minimum => lo,
                Extreme::Maximum => hi,
            };
            return Ok(ThetaSolution {
                theta,
                status: EstimateStatus::Extreme(extreme),
                iterations: 0,
            });
        }

        self.solve(&lik, start_value(items, pattern))
    }

    /// Like [`estimate`](Self::estimate) but reports degenerate patterns as errors
    pub fn estimate_strict(
        &self,
        items: &ItemSet,
        pattern: &ResponsePattern,
    ) -> Result<ThetaSolution> {
        if let Some(extreme) = pattern.extreme(items) {
            return Err(Error::DegenerateResponse { extreme });
        }
        self.estimate(items, pattern)
    }

    fn solve(&self, lik: &PatternLikelihood<'_>, start: f64) -> Result<ThetaSolution> {
        let (lo, hi) = self.config.range;

        let (g_lo, _) = self.equation(&lik.evaluate(lo));
        if g_lo < 0.0 {
            return Ok(clamped(lo, Bound::Lower));
        }
        let (g_hi, _) = self.equation(&lik.evaluate(hi));
        if g_hi > 0.0 {
            return Ok(clamped(hi, Bound::Upper));
        }
        if g_lo == 0.0 {
            return Ok(interior(lo, 0));
        }
        if g_hi == 0.0 {
            return Ok(interior(hi, 0));
        }

        // Invariant: g(a) > 0 > g(b)
        let (mut a, mut b) = (lo, hi);
        let mut x = if start > a && start < b { start } else { 0.5 * (a + b) };
        let mut last_step = f64::INFINITY;

        for iteration in 1..=self.config.max_iterations {
            let (g, slope) = self.equation(&lik.evaluate(x));
            if g == 0.0 {
                return Ok(interior(x, iteration));
            }
            if g > 0.0 {
                a = x;
            } else {
                b = x;
            }

            let newton = x - g / slope;
            let next = if slope < 0.0 && newton.is_finite() && newton > a && newton < b {
                newton
            } else {
                0.5 * (a + b)
            };

            last_step = next - x;
            x = next;
            trace!(iteration, theta = x, step = last_step, "root search");

            if last_step.abs() < self.config.tolerance || (b - a) < self.config.tolerance {
                return Ok(interior(x, iteration));
            }
        }

        Err(Error::NonConvergence {
            iterations: self.config.max_iterations,
            last_step: last_step.abs(),
        })
    }
}

fn interior(theta: f64, iterations: usize) -> ThetaSolution {
    ThetaSolution {
        theta,
        status: EstimateStatus::Interior,
        iterations,
    }
}

fn clamped(theta: f64, bound: Bound) -> ThetaSolution {
    ThetaSolution {
        theta,
        status: EstimateStatus::Clamped(bound),
        iterations: 0,
    }
}

/// Log-odds of the observed proportion of the maximum score
fn start_value(items: &ItemSet, pattern: &ResponsePattern) -> f64 {
    let score = pattern.sum_score() as f64;
    let max = pattern.max_observed_score(items) as f64;
    ((score + 0.5) / (max - score + 0.5)).ln()
}
