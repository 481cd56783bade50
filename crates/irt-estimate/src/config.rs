//! Estimator configuration

use irt_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default search range for the trait estimate
pub const DEFAULT_RANGE: (f64, f64) = (-6.0, 6.0);

/// Default convergence tolerance on `|Δθ|`
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default hard cap on root-finding iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Information below this is treated as zero
pub const DEFAULT_MIN_INFORMATION: f64 = 1e-10;

/// Estimating equation for the point estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Warm's weighted likelihood: `score + J / (2I) = 0`
    #[default]
    WeightedLikelihood,
    /// Plain maximum likelihood: `score = 0`
    MaximumLikelihood,
}

/// Curvature used for the standard error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeMethod {
    /// Curvature of the weighted log-likelihood at the estimate
    #[default]
    BiasCorrected,
    /// Fisher information at the estimate
    Fisher,
}

/// Settings shared by the theta and standard error estimators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub method: EstimationMethod,
    pub se_method: SeMethod,
    /// Closed search interval; degenerate patterns are placed on its ends
    pub range: (f64, f64),
    pub tolerance: f64,
    pub max_iterations: usize,
    pub min_information: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            method: EstimationMethod::default(),
            se_method: SeMethod::default(),
            range: DEFAULT_RANGE,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_information: DEFAULT_MIN_INFORMATION,
        }
    }
}

impl EstimatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: EstimationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn se_method(mut self, se_method: SeMethod) -> Self {
        self.se_method = se_method;
        self
    }

    pub fn range(mut self, lo: f64, hi: f64) -> Self {
        self.range = (lo, hi);
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn min_information(mut self, min_information: f64) -> Self {
        self.min_information = min_information;
        self
    }

    /// Check that the settings describe a solvable search
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.range;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(Error::InvalidParameter(format!(
                "search range must be finite with lo < hi, got ({lo}, {hi})"
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.min_information.is_nan() || self.min_information < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "min_information must be non-negative, got {}",
                self.min_information
            )));
        }
        Ok(())
    }
}
