//! Likelihood and information surface of a response pattern
//!
//! Everything is a sum over the items the respondent actually answered;
//! missing responses contribute nothing to the log-likelihood, score,
//! information or bias terms but do not invalidate the pattern.

use crate::pcm::{category_moments, log_category_probability, CategoryMoments};
use crate::{ItemSet, ResponsePattern, Result};
use serde::{Deserialize, Serialize};

/// Score, information and Warm terms of a pattern at one `θ`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfacePoint {
    pub theta: f64,
    /// First derivative of the log-likelihood
    pub score: f64,
    /// Fisher information `Σ Var_i[k]`
    pub information: f64,
    /// Warm's `J(θ) = Σ_i Σ_k P'_ik P''_ik / P_ik`, equal to `Σ μ3_i` for the PCM
    pub bias_term: f64,
    /// `dJ/dθ = Σ κ4_i`
    pub bias_term_derivative: f64,
}

impl SurfacePoint {
    /// Warm's weighted-likelihood estimating function `score + J / (2I)`
    ///
    /// Falls back to the plain score when information has vanished.
    pub fn weighted_score(&self) -> f64 {
        if self.information > 0.0 {
            self.score + self.bias_term / (2.0 * self.information)
        } else {
            self.score
        }
    }

    /// Negative derivative of [`weighted_score`](Self::weighted_score)
    ///
    /// `I − (J'·I − J²) / (2I²)`: the curvature of the weighted log-likelihood.
    pub fn weighted_information(&self) -> f64 {
        let i = self.information;
        if i > 0.0 {
            i - (self.bias_term_derivative * i - self.bias_term * self.bias_term) / (2.0 * i * i)
        } else {
            i
        }
    }
}

/// A response pattern paired with the items it was scored against
#[derive(Debug, Clone, Copy)]
pub struct PatternLikelihood<'a> {
    items: &'a ItemSet,
    pattern: &'a ResponsePattern,
}

impl<'a> PatternLikelihood<'a> {
    /// Pair a pattern with its items, checking length and category ranges
    pub fn new(items: &'a ItemSet, pattern: &'a ResponsePattern) -> Result<Self> {
        pattern.validate(items)?;
        Ok(Self { items, pattern })
    }

    pub fn items(&self) -> &'a ItemSet {
        self.items
    }

    pub fn pattern(&self) -> &'a ResponsePattern {
        self.pattern
    }

    fn observed_moments(&self, theta: f64) -> impl Iterator<Item = (usize, CategoryMoments)> + '_ {
        self.pattern.observed().map(move |(pos, k)| {
            let item = &self.items.items()[pos];
            (k, category_moments(item.thresholds(), theta))
        })
    }

    pub fn log_likelihood(&self, theta: f64) -> f64 {
        self.pattern
            .observed()
            .map(|(pos, k)| log_category_probability(self.items.items()[pos].thresholds(), theta, k))
            .sum()
    }

    /// `Σ (x_i − E_i[k])`, strictly decreasing in `θ`
    pub fn score(&self, theta: f64) -> f64 {
        self.observed_moments(theta)
            .map(|(k, m)| k as f64 - m.mean)
            .sum()
    }

    pub fn information(&self, theta: f64) -> f64 {
        self.observed_moments(theta).map(|(_, m)| m.variance).sum()
    }

    pub fn bias_term(&self, theta: f64) -> f64 {
        self.observed_moments(theta).map(|(_, m)| m.third_central).sum()
    }

    /// All surface quantities in one pass over the items
    pub fn evaluate(&self, theta: f64) -> SurfacePoint {
        let mut point = SurfacePoint {
            theta,
            ..SurfacePoint::default()
        };
        for (k, m) in self.observed_moments(theta) {
            point.score += k as f64 - m.mean;
            point.information += m.variance;
            point.bias_term += m.third_central;
            point.bias_term_derivative += m.fourth_cumulant;
        }
        point
    }
}

/// `log L(θ)` of a pattern
pub fn log_likelihood(items: &ItemSet, pattern: &ResponsePattern, theta: f64) -> Result<f64> {
    Ok(PatternLikelihood::new(items, pattern)?.log_likelihood(theta))
}

/// First derivative of `log L(θ)`
pub fn score(items: &ItemSet, pattern: &ResponsePattern, theta: f64) -> Result<f64> {
    Ok(PatternLikelihood::new(items, pattern)?.score(theta))
}

/// Fisher information of the observed items
pub fn information(items: &ItemSet, pattern: &ResponsePattern, theta: f64) -> Result<f64> {
    Ok(PatternLikelihood::new(items, pattern)?.information(theta))
}

/// Test information over every item in the set
pub fn test_information(items: &ItemSet, theta: f64) -> f64 {
    items
        .iter()
        .map(|item| category_moments(item.thresholds(), theta).variance)
        .sum()
}

/// Expected sum score at `θ` (test characteristic curve)
pub fn expected_score(items: &ItemSet, theta: f64) -> f64 {
    items
        .iter()
        .map(|item| category_moments(item.thresholds(), theta).mean)
        .sum()
}

/// One point of a test information curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InformationPoint {
    pub theta: f64,
    pub information: f64,
    /// `1 / sqrt(information)`, infinite where information vanishes
    pub sem: f64,
    pub expected_score: f64,
}

/// Test information and conditional SEM over a grid of `θ`
pub fn information_curve(items: &ItemSet, grid: &[f64]) -> Vec<InformationPoint> {
    grid.iter()
        .map(|&theta| {
            let information = test_information(items, theta);
            let sem = if information > 0.0 {
                1.0 / information.sqrt()
            } else {
                f64::INFINITY
            };
            InformationPoint {
                theta,
                information,
                sem,
                expected_score: expected_score(items, theta),
            }
        })
        .collect()
}

/// Evenly spaced grid from `lo` to `hi` inclusive
pub fn theta_grid(lo: f64, hi: f64, n_points: usize) -> Vec<f64> {
    match n_points {
        0 => Vec::new(),
        1 => vec![lo],
        n => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}
