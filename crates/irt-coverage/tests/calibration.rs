//! Nominal versus empirical coverage on a realistic population

use irt_core::fixtures::seven_item_pcm;
use irt_core::sequential;
use irt_coverage::{evaluate_coverage, SimulationStudy, StudyConfig};
use irt_estimate::{BatchEstimator, EstimatorConfig, SeMethod, TraitEstimator};
use irt_simulate::{ResponseSimulator, TraitDistribution};

fn population() -> StudyConfig {
    StudyConfig::for_items(&seven_item_pcm())
        .n_persons(2000)
        .traits(TraitDistribution::normal(0.57, 1.5))
        .seed(20_240_917)
        .levels(vec![0.95, 0.90, 0.75])
}

#[test]
fn test_weighted_likelihood_intervals_are_calibrated() {
    let report = SimulationStudy::new(population().parallel(false))
        .unwrap()
        .run()
        .unwrap();
    let coverage = &report.coverage;

    assert_eq!(coverage.excluded, 0);
    let c95 = coverage.coverage_at(0.95).unwrap();
    let c90 = coverage.coverage_at(0.90).unwrap();
    let c75 = coverage.coverage_at(0.75).unwrap();
    assert!((0.90..=0.99).contains(&c95), "95% coverage {c95}");
    assert!((0.85..=0.95).contains(&c90), "90% coverage {c90}");
    assert!((0.70..=0.80).contains(&c75), "75% coverage {c75}");
    assert!(c75 < c90 && c90 < c95);

    assert!(coverage.accuracy.bias.abs() < 0.2);
    assert!(coverage.accuracy.correlation.unwrap() > 0.85);
}

#[test]
fn test_fisher_intervals_also_reasonable() {
    let config = population()
        .parallel(false)
        .estimator(EstimatorConfig::new().se_method(SeMethod::Fisher));
    let report = SimulationStudy::new(config).unwrap().run().unwrap();
    let c95 = report.coverage.coverage_at(0.95).unwrap();
    assert!((0.88..=0.99).contains(&c95), "95% coverage {c95}");
}

#[test]
fn test_manual_pipeline_matches_study_shape() {
    let items = seven_item_pcm();
    let thetas = TraitDistribution::normal(0.0, 1.0).generate(300, 5).unwrap();
    let data = ResponseSimulator::new(&items)
        .with_seed(6)
        .simulate(&thetas)
        .unwrap();
    let estimates = BatchEstimator::new(sequential(), TraitEstimator::default())
        .estimate_all(&items, &data.patterns())
        .into_estimates()
        .unwrap();

    let report = evaluate_coverage(&data, &estimates, &[0.5, 0.95]).unwrap();
    assert_eq!(report.n, 300);
    assert!(report.coverage_at(0.5).unwrap() < report.coverage_at(0.95).unwrap());
    assert_eq!(
        report.accuracy.undefined_se,
        estimates.iter().filter(|e| e.se.is_infinite()).count()
    );
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_study_matches_sequential() {
    let config = population().n_persons(500);
    let seq = SimulationStudy::new(config.clone().parallel(false)).unwrap().run().unwrap();
    let par = SimulationStudy::new(config.parallel(true)).unwrap().run().unwrap();
    assert_eq!(seq, par);
}
