//! Standard errors of trait estimates

use crate::config::{EstimatorConfig, SeMethod, DEFAULT_MIN_INFORMATION};
use irt_core::{Error, ItemSet, PatternLikelihood, ResponsePattern, Result};
use tracing::debug;

/// Standard error from the curvature of the (weighted) log-likelihood
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardErrorEstimator {
    method: SeMethod,
    min_information: f64,
}

impl Default for StandardErrorEstimator {
    fn default() -> Self {
        Self {
            method: SeMethod::default(),
            min_information: DEFAULT_MIN_INFORMATION,
        }
    }
}

impl StandardErrorEstimator {
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            method: config.se_method,
            min_information: config.min_information,
        })
    }

    pub fn method(&self) -> SeMethod {
        self.method
    }

    /// Curvature at `theta`, or `None` when it is too small to invert
    fn curvature(&self, lik: &PatternLikelihood<'_>, theta: f64) -> Option<f64> {
        let point = lik.evaluate(theta);
        let fisher = point.information;
        if fisher.is_nan() || fisher <= self.min_information {
            return None;
        }
        let curvature = match self.method {
            SeMethod::Fisher => fisher,
            SeMethod::BiasCorrected => {
                let corrected = point.weighted_information();
                if corrected.is_finite() && corrected > self.min_information {
                    corrected
                } else {
                    debug!(theta, corrected, fisher, "falling back to Fisher information");
                    fisher
                }
            }
        };
        Some(curvature)
    }

    /// Standard error at `theta`; `f64::INFINITY` when undefined
    ///
    /// Extreme patterns never get a finite standard error, whatever the
    /// information at the range end.
    pub fn estimate(&self, items: &ItemSet, pattern: &ResponsePattern, theta: f64) -> Result<f64> {
        let lik = PatternLikelihood::new(items, pattern)?;
        if pattern.extreme(items).is_some() || pattern.n_observed() == 0 {
            return Ok(f64::INFINITY);
        }
        Ok(self
            .curvature(&lik, theta)
            .map_or(f64::INFINITY, |c| 1.0 / c.sqrt()))
    }

    /// Like [`estimate`](Self::estimate) but reports an undefined value as an error
    pub fn estimate_strict(
        &self,
        items: &ItemSet,
        pattern: &ResponsePattern,
        theta: f64,
    ) -> Result<f64> {
        let se = self.estimate(items, pattern, theta)?;
        if se.is_finite() {
            Ok(se)
        } else {
            Err(Error::UndefinedStandardError { theta })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use irt_core::fixtures::seven_item_pcm;
    use irt_core::information;

    fn estimator(method: SeMethod) -> StandardErrorEstimator {
        StandardErrorEstimator::new(&EstimatorConfig::new().se_method(method)).unwrap()
    }

    #[test]
    fn test_fisher_se_is_inverse_root_information() {
        let items = seven_item_pcm();
        let pattern = crate::scoring_table::representative_pattern(&items, 14).unwrap();
        let se = estimator(SeMethod::Fisher)
            .estimate(&items, &pattern, 0.2)
            .unwrap();
        let info = information(&items, &pattern, 0.2).unwrap();
        assert_relative_eq!(se, 1.0 / info.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_bias_corrected_close_to_fisher_mid_range() {
        let items = seven_item_pcm();
        let pattern = crate::scoring_table::representative_pattern(&items, 14).unwrap();
        let fisher = estimator(SeMethod::Fisher)
            .estimate(&items, &pattern, 0.0)
            .unwrap();
        let corrected = estimator(SeMethod::BiasCorrected)
            .estimate(&items, &pattern, 0.0)
            .unwrap();
        assert!(corrected.is_finite());
        assert!((corrected - fisher).abs() / fisher < 0.1);
    }

    #[test]
    fn test_extreme_pattern_has_infinite_se() {
        let items = seven_item_pcm();
        let zeros = irt_core::ResponsePattern::uniform(&items, 0);
        let est = estimator(SeMethod::BiasCorrected);
        assert_eq!(est.estimate(&items, &zeros, -5.0).unwrap(), f64::INFINITY);
        assert!(matches!(
            est.estimate_strict(&items, &zeros, -5.0),
            Err(Error::UndefinedStandardError { .. })
        ));
    }

    #[test]
    fn test_vanishing_information_gives_infinite_se() {
        let items = seven_item_pcm();
        let pattern = crate::scoring_table::representative_pattern(&items, 10).unwrap();
        let est = StandardErrorEstimator::new(
            &EstimatorConfig::new()
                .se_method(SeMethod::Fisher)
                .min_information(1e-3),
        )
        .unwrap();
        assert!(est.estimate(&items, &pattern, 0.0).unwrap().is_finite());
        assert_eq!(est.estimate(&items, &pattern, 40.0).unwrap(), f64::INFINITY);
    }
}
