//! Coverage of `θ̂ ± z·SE` intervals against generating trait values

use crate::level::ConfidenceLevel;
use irt_core::{Error, Result};
use irt_estimate::TraitEstimate;
use irt_simulate::SimulatedDataset;
use serde::Serialize;
use tracing::{debug, instrument};

/// Empirical coverage at one confidence level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelCoverage {
    pub level: ConfidenceLevel,
    /// Critical value `z` used for the interval half-width
    pub z: f64,
    pub covered: usize,
    /// `covered / n`
    pub coverage: f64,
}

/// Point-estimate accuracy against the generating trait values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracySummary {
    pub n: usize,
    /// Mean of `θ̂ − θ`
    pub bias: f64,
    pub mae: f64,
    pub rmse: f64,
    /// Pearson correlation; `None` when either side has no spread
    pub correlation: Option<f64>,
    /// Estimates whose standard error is undefined
    pub undefined_se: usize,
}

impl AccuracySummary {
    pub fn from_pairs(pairs: &[(f64, TraitEstimate)]) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::InvalidInput(
                "accuracy needs at least one estimate".to_string(),
            ));
        }
        let n = pairs.len() as f64;
        let errors: Vec<f64> = pairs.iter().map(|(truth, e)| e.theta - truth).collect();
        let bias = errors.iter().sum::<f64>() / n;
        let mae = errors.iter().map(|d| d.abs()).sum::<f64>() / n;
        let rmse = (errors.iter().map(|d| d * d).sum::<f64>() / n).sqrt();

        let truths: Vec<f64> = pairs.iter().map(|(t, _)| *t).collect();
        let thetas: Vec<f64> = pairs.iter().map(|(_, e)| e.theta).collect();

        Ok(Self {
            n: pairs.len(),
            bias,
            mae,
            rmse,
            correlation: pearson(&truths, &thetas),
            undefined_se: pairs.iter().filter(|(_, e)| !e.has_standard_error()).count(),
        })
    }
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    let denom = (sxx * syy).sqrt();
    (denom > 0.0).then(|| sxy / denom)
}

/// Coverage at each requested level plus accuracy of the point estimates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Persons that entered the evaluation
    pub n: usize,
    /// Persons left out because their estimate failed
    pub excluded: usize,
    pub levels: Vec<LevelCoverage>,
    pub accuracy: AccuracySummary,
}

impl CoverageReport {
    /// Coverage at a level, if it was evaluated
    pub fn coverage_at(&self, level: f64) -> Option<f64> {
        self.levels
            .iter()
            .find(|c| (c.level.value() - level).abs() < 1e-12)
            .map(|c| c.coverage)
    }
}

fn parse_levels(levels: &[f64]) -> Result<Vec<(ConfidenceLevel, f64)>> {
    if levels.is_empty() {
        return Err(Error::InvalidInput(
            "at least one confidence level is required".to_string(),
        ));
    }
    levels
        .iter()
        .map(|&l| {
            let level = ConfidenceLevel::try_new(l)?;
            Ok((level, level.critical_value()?))
        })
        .collect()
}

fn evaluate(pairs: &[(f64, TraitEstimate)], levels: &[f64], excluded: usize) -> Result<CoverageReport> {
    let levels = parse_levels(levels)?;
    let accuracy = AccuracySummary::from_pairs(pairs)?;
    let n = pairs.len();

    let levels = levels
        .into_iter()
        .map(|(level, z)| {
            let covered = pairs.iter().filter(|(truth, e)| e.covers(*truth, z)).count();
            let coverage = covered as f64 / n as f64;
            debug!(%level, z, coverage, "coverage");
            LevelCoverage {
                level,
                z,
                covered,
                coverage,
            }
        })
        .collect();

    Ok(CoverageReport {
        n,
        excluded,
        levels,
        accuracy,
    })
}

fn check_lengths(dataset: &SimulatedDataset, n_estimates: usize) -> Result<()> {
    if dataset.len() != n_estimates {
        return Err(Error::size_mismatch(dataset.len(), n_estimates, "coverage evaluation"));
    }
    Ok(())
}

/// Fraction of persons with `|θ̂ − θ| < z·SE` at each level
///
/// `estimates` must be row-aligned with the dataset. An infinite standard
/// error counts as covering.
#[instrument(skip_all, fields(n = estimates.len()))]
pub fn evaluate_coverage(
    dataset: &SimulatedDataset,
    estimates: &[TraitEstimate],
    levels: &[f64],
) -> Result<CoverageReport> {
    check_lengths(dataset, estimates.len())?;
    let pairs: Vec<(f64, TraitEstimate)> = dataset
        .persons()
        .iter()
        .zip(estimates)
        .map(|(p, e)| (p.theta, *e))
        .collect();
    evaluate(&pairs, levels, 0)
}

/// Like [`evaluate_coverage`] but for batch results, skipping failed rows
#[instrument(skip_all, fields(n = results.len()))]
pub fn coverage_from_results(
    dataset: &SimulatedDataset,
    results: &[Result<TraitEstimate>],
    levels: &[f64],
) -> Result<CoverageReport> {
    check_lengths(dataset, results.len())?;
    let pairs: Vec<(f64, TraitEstimate)> = dataset
        .persons()
        .iter()
        .zip(results)
        .filter_map(|(p, r)| r.as_ref().ok().map(|e| (p.theta, *e)))
        .collect();
    let excluded = results.len() - pairs.len();
    evaluate(&pairs, levels, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use irt_core::fixtures::mixed_length_items;
    use irt_estimate::EstimateStatus;
    use irt_simulate::ResponseSimulator;

    fn estimate(theta: f64, se: f64) -> TraitEstimate {
        TraitEstimate {
            theta,
            se,
            status: EstimateStatus::Interior,
            iterations: 3,
        }
    }

    fn dataset(thetas: &[f64]) -> SimulatedDataset {
        ResponseSimulator::new(&mixed_length_items())
            .with_seed(1)
            .simulate(thetas)
            .unwrap()
    }

    #[test]
    fn test_coverage_counts_strict_inequality() {
        let data = dataset(&[0.0, 0.0, 0.0, 0.0]);
        let z95 = ConfidenceLevel::NINETY_FIVE.critical_value().unwrap();
        let estimates = vec![
            estimate(0.1, 0.1),
            estimate(1.0, 0.1),
            estimate(-0.5, f64::INFINITY),
            estimate(z95 * 0.5, 0.5),
        ];
        let report = evaluate_coverage(&data, &estimates, &[0.95]).unwrap();
        assert_eq!(report.n, 4);
        // The last sits exactly on the boundary and does not count
        assert_eq!(report.levels[0].covered, 2);
        assert_relative_eq!(report.coverage_at(0.95).unwrap(), 0.5);
        assert_eq!(report.accuracy.undefined_se, 1);
    }

    #[test]
    fn test_accuracy_summary() {
        let pairs = vec![
            (0.0, estimate(0.5, 1.0)),
            (1.0, estimate(0.5, 1.0)),
            (2.0, estimate(2.5, 1.0)),
        ];
        let acc = AccuracySummary::from_pairs(&pairs).unwrap();
        assert_relative_eq!(acc.bias, 0.5 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(acc.mae, 0.5, epsilon = 1e-12);
        assert_relative_eq!(acc.rmse, 0.5, epsilon = 1e-12);
        assert!(acc.correlation.unwrap() > 0.8);

        let flat = vec![(0.0, estimate(0.5, 1.0)), (0.0, estimate(0.7, 1.0))];
        assert!(AccuracySummary::from_pairs(&flat).unwrap().correlation.is_none());
    }

    #[test]
    fn test_length_mismatch_and_bad_levels() {
        let data = dataset(&[0.0, 1.0]);
        let one = vec![estimate(0.0, 1.0)];
        assert!(matches!(
            evaluate_coverage(&data, &one, &[0.95]),
            Err(Error::InvalidInput(_))
        ));

        let two = vec![estimate(0.0, 1.0), estimate(1.0, 1.0)];
        assert!(matches!(
            evaluate_coverage(&data, &two, &[1.2]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(evaluate_coverage(&data, &two, &[]).is_err());
    }

    #[test]
    fn test_failed_results_are_excluded() {
        let data = dataset(&[0.0, 0.5, 1.0]);
        let results = vec![
            Ok(estimate(0.1, 0.5)),
            Err(Error::NonConvergence {
                iterations: 100,
                last_step: 0.1,
            }),
            Ok(estimate(3.0, 0.5)),
        ];
        let report = coverage_from_results(&data, &results, &[0.9, 0.5]).unwrap();
        assert_eq!(report.n, 2);
        assert_eq!(report.excluded, 1);
        assert_eq!(report.levels.len(), 2);
        assert_relative_eq!(report.coverage_at(0.9).unwrap(), 0.5);
    }
}
