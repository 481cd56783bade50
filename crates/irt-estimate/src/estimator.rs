//! Point estimate plus standard error in one call

use crate::config::EstimatorConfig;
use crate::standard_error::StandardErrorEstimator;
use crate::theta::ThetaEstimator;
use crate::types::TraitEstimate;
use irt_core::{ItemSet, ResponsePattern, Result};

/// Pairs a [`ThetaEstimator`] with a [`StandardErrorEstimator`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraitEstimator {
    theta: ThetaEstimator,
    se: StandardErrorEstimator,
}

impl TraitEstimator {
    /// Build both estimators from one configuration
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        Ok(Self {
            theta: ThetaEstimator::new(config)?,
            se: StandardErrorEstimator::new(&config)?,
        })
    }

    pub fn from_parts(theta: ThetaEstimator, se: StandardErrorEstimator) -> Self {
        Self { theta, se }
    }

    pub fn theta_estimator(&self) -> &ThetaEstimator {
        &self.theta
    }

    pub fn se_estimator(&self) -> &StandardErrorEstimator {
        &self.se
    }

    pub fn config(&self) -> &EstimatorConfig {
        self.theta.config()
    }

    /// Estimate theta and its standard error for one pattern
    pub fn estimate(&self, items: &ItemSet, pattern: &ResponsePattern) -> Result<TraitEstimate> {
        let solution = self.theta.estimate(items, pattern)?;
        let se = self.se.estimate(items, pattern, solution.theta)?;
        Ok(TraitEstimate::new(solution, se))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EstimateStatus;
    use irt_core::fixtures::seven_item_pcm;
    use irt_core::Extreme;

    #[test]
    fn test_all_zero_pattern_on_narrow_range() {
        let items = seven_item_pcm();
        let estimator = TraitEstimator::new(EstimatorConfig::new().range(-5.0, 5.0)).unwrap();
        let est = estimator
            .estimate(&items, &ResponsePattern::uniform(&items, 0))
            .unwrap();
        assert_eq!(est.theta, -5.0);
        assert_eq!(est.se, f64::INFINITY);
        assert_eq!(est.status, EstimateStatus::Extreme(Extreme::Minimum));
    }

    #[test]
    fn test_interior_estimate_has_finite_se() {
        let items = seven_item_pcm();
        let estimator = TraitEstimator::default();
        let pattern = ResponsePattern::uniform(&items, 2);
        let est = estimator.estimate(&items, &pattern).unwrap();
        assert!(est.status.is_interior());
        assert!(est.se.is_finite() && est.se > 0.0);
        assert!(est.iterations > 0);
    }
}
