//! Estimate types

use irt_core::{Error, Extreme, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// End of the search range an estimate was pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Lower,
    Upper,
}

/// How the point estimate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateStatus {
    /// Root of the estimating equation inside the search range
    Interior,
    /// All-minimum or all-maximum pattern, placed on the range end
    Extreme(Extreme),
    /// Interior pattern whose root lies beyond the range end
    Clamped(Bound),
}

impl EstimateStatus {
    pub fn is_interior(&self) -> bool {
        matches!(self, EstimateStatus::Interior)
    }

    pub fn is_boundary(&self) -> bool {
        !self.is_interior()
    }
}

impl fmt::Display for EstimateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateStatus::Interior => write!(f, "interior"),
            EstimateStatus::Extreme(Extreme::Minimum) => write!(f, "extreme_minimum"),
            EstimateStatus::Extreme(Extreme::Maximum) => write!(f, "extreme_maximum"),
            EstimateStatus::Clamped(Bound::Lower) => write!(f, "clamped_lower"),
            EstimateStatus::Clamped(Bound::Upper) => write!(f, "clamped_upper"),
        }
    }
}

/// Output of the theta estimator before a standard error is attached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThetaSolution {
    pub theta: f64,
    pub status: EstimateStatus,
    pub iterations: usize,
}

/// Point estimate and standard error for one response pattern
///
/// `se` is `f64::INFINITY` when the standard error is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitEstimate {
    pub theta: f64,
    pub se: f64,
    pub status: EstimateStatus,
    pub iterations: usize,
}

impl TraitEstimate {
    pub fn new(solution: ThetaSolution, se: f64) -> Self {
        Self {
            theta: solution.theta,
            se,
            status: solution.status,
            iterations: solution.iterations,
        }
    }

    /// Whether a finite standard error is available
    pub fn has_standard_error(&self) -> bool {
        self.se.is_finite()
    }

    /// The standard error, or [`Error::UndefinedStandardError`]
    pub fn finite_se(&self) -> Result<f64> {
        if self.has_standard_error() {
            Ok(self.se)
        } else {
            Err(Error::UndefinedStandardError { theta: self.theta })
        }
    }

    /// `θ̂ ± z·SE`
    pub fn interval(&self, z: f64) -> (f64, f64) {
        let margin = z * self.se;
        (self.theta - margin, self.theta + margin)
    }

    /// Whether `|θ̂ − truth| < z·SE`; an undefined SE covers everything
    pub fn covers(&self, truth: f64, z: f64) -> bool {
        (self.theta - truth).abs() < z * self.se
    }
}

impl fmt::Display for TraitEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "theta={:.4}, se={:.4} ({})", self.theta, self.se, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(theta: f64, se: f64) -> TraitEstimate {
        TraitEstimate {
            theta,
            se,
            status: EstimateStatus::Interior,
            iterations: 4,
        }
    }

    #[test]
    fn test_interval_and_coverage() {
        let e = estimate(0.5, 0.25);
        let (lo, hi) = e.interval(2.0);
        assert!((lo - 0.0).abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
        assert!(e.covers(0.9, 2.0));
        assert!(!e.covers(1.1, 2.0));
        assert!(!e.covers(1.0, 2.0));
    }

    #[test]
    fn test_undefined_standard_error() {
        let e = TraitEstimate {
            status: EstimateStatus::Extreme(Extreme::Minimum),
            ..estimate(-5.0, f64::INFINITY)
        };
        assert!(!e.has_standard_error());
        assert!(e.covers(3.0, 1.96));
        assert!(matches!(
            e.finite_se(),
            Err(Error::UndefinedStandardError { .. })
        ));
        assert!(e.status.is_boundary());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(EstimateStatus::Interior.to_string(), "interior");
        assert_eq!(
            EstimateStatus::Extreme(Extreme::Maximum).to_string(),
            "extreme_maximum"
        );
        assert_eq!(
            EstimateStatus::Clamped(Bound::Lower).to_string(),
            "clamped_lower"
        );
    }
}
