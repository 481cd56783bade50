//! Simulation study driver
//!
//! A study draws true trait values, simulates responses, estimates every
//! pattern and compares the estimates with the truth. Everything it needs
//! lives in a [`StudyConfig`], which can be read from JSON, so a run is
//! reproducible from its config file alone.

use crate::evaluate::{coverage_from_results, CoverageReport};
use irt_core::execution::ExecutionEngine;
#[cfg(feature = "parallel")]
use irt_core::ParallelEngine;
use irt_core::{auto_engine, sequential, Error, Item, ItemSet, Result};
use irt_estimate::{BatchEstimator, BatchSummary, EstimatorConfig, TraitEstimator};
use irt_simulate::{ResponseSimulator, TraitDistribution};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Item parameters in serializable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub thresholds: Vec<f64>,
}

impl From<&Item> for ItemDefinition {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            thresholds: item.thresholds().to_vec(),
        }
    }
}

/// Everything needed to rerun a study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub items: Vec<ItemDefinition>,
    pub n_persons: usize,
    pub traits: TraitDistribution,
    pub seed: u64,
    pub levels: Vec<f64>,
    pub estimator: EstimatorConfig,
    /// Use the parallel engine when it is compiled in
    pub parallel: bool,
    /// Size of a dedicated worker pool; `None` runs on the global pool
    pub threads: Option<usize>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            n_persons: 2000,
            traits: TraitDistribution::default(),
            seed: 0,
            levels: vec![0.75, 0.90, 0.95],
            estimator: EstimatorConfig::default(),
            parallel: true,
            threads: None,
        }
    }
}

impl StudyConfig {
    /// Config for an existing item set, other settings at their defaults
    pub fn for_items(items: &ItemSet) -> Self {
        Self {
            items: items.iter().map(ItemDefinition::from).collect(),
            ..Self::default()
        }
    }

    pub fn n_persons(mut self, n: usize) -> Self {
        self.n_persons = n;
        self
    }

    pub fn traits(mut self, traits: TraitDistribution) -> Self {
        self.traits = traits;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = levels;
        self
    }

    pub fn estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("invalid study config: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Computation(format!("failed to serialize study config: {e}")))
    }

    /// Build the item set the study runs on
    pub fn item_set(&self) -> Result<ItemSet> {
        let items = self
            .items
            .iter()
            .map(|def| Item::new(def.id.clone(), def.thresholds.clone()))
            .collect::<Result<Vec<_>>>()?;
        ItemSet::new(items)
    }
}

/// Outcome of one study run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyReport {
    pub seed: u64,
    pub n_persons: usize,
    pub estimation: BatchSummary,
    pub coverage: CoverageReport,
}

impl StudyReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Computation(format!("failed to serialize study report: {e}")))
    }
}

/// Generate, simulate, estimate and evaluate
#[derive(Debug, Clone)]
pub struct SimulationStudy {
    items: ItemSet,
    config: StudyConfig,
}

impl SimulationStudy {
    pub fn new(config: StudyConfig) -> Result<Self> {
        if config.n_persons == 0 {
            return Err(Error::InvalidParameter(
                "a study needs at least one person".to_string(),
            ));
        }
        if config.threads == Some(0) {
            return Err(Error::InvalidParameter(
                "a study needs at least one worker thread".to_string(),
            ));
        }
        config.estimator.validate()?;
        let items = config.item_set()?;
        Ok(Self { items, config })
    }

    pub fn items(&self) -> &ItemSet {
        &self.items
    }

    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    pub fn run(&self) -> Result<StudyReport> {
        match (self.config.parallel, self.config.threads) {
            (false, _) => self.run_with(sequential()),
            #[cfg(feature = "parallel")]
            (true, Some(threads)) => self.run_with(ParallelEngine::with_num_threads(threads)?),
            _ => self.run_with(auto_engine()),
        }
    }

    /// Run on an explicit execution engine
    #[instrument(skip_all, fields(n_persons = self.config.n_persons, seed = self.config.seed))]
    pub fn run_with<E: ExecutionEngine>(&self, engine: E) -> Result<StudyReport> {
        let config = &self.config;
        // Traits read their own stream of the seed, persons read theirs
        let thetas = config.traits.generate(config.n_persons, config.seed)?;
        let dataset = ResponseSimulator::new(&self.items)
            .with_engine(engine.clone())
            .with_seed(config.seed)
            .simulate(&thetas)?;

        let estimator = TraitEstimator::new(config.estimator)?;
        let batch = BatchEstimator::new(engine, estimator).estimate_all(&self.items, &dataset.patterns());
        let estimation = batch.summary();
        let coverage = coverage_from_results(&dataset, batch.results(), &config.levels)?;

        for level in &coverage.levels {
            info!(level = %level.level, coverage = level.coverage, "study coverage");
        }

        Ok(StudyReport {
            seed: config.seed,
            n_persons: config.n_persons,
            estimation,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use irt_core::fixtures::seven_item_pcm;

    #[test]
    fn test_config_json_round_trip() {
        let config = StudyConfig::for_items(&seven_item_pcm())
            .n_persons(250)
            .seed(3)
            .traits(TraitDistribution::normal(0.57, 1.5));
        let json = config.to_json().unwrap();
        let back = StudyConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.item_set().unwrap().max_score(), 28);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "items": [{"id": "a", "thresholds": [-1.0, 1.0]}, {"id": "b", "thresholds": [0.0]}],
            "n_persons": 10,
            "traits": {"kind": "uniform", "lo": -1.0, "hi": 1.0}
        }"#;
        let config = StudyConfig::from_json(json).unwrap();
        assert_eq!(config.n_persons, 10);
        assert_eq!(config.levels, vec![0.75, 0.90, 0.95]);
        assert_eq!(config.estimator, EstimatorConfig::default());
        assert_eq!(config.traits, TraitDistribution::uniform(-1.0, 1.0));
    }

    #[test]
    fn test_invalid_studies_rejected() {
        assert!(SimulationStudy::new(StudyConfig::default()).is_err());
        assert!(SimulationStudy::new(StudyConfig::for_items(&seven_item_pcm()).n_persons(0)).is_err());
        assert!(SimulationStudy::new(StudyConfig::for_items(&seven_item_pcm()).threads(0)).is_err());
        assert!(StudyConfig::from_json("{\"n_persons\": \"many\"}").is_err());
    }

    #[test]
    fn test_small_study_runs_and_is_reproducible() {
        let config = StudyConfig::for_items(&seven_item_pcm())
            .n_persons(200)
            .seed(12)
            .parallel(false);
        let study = SimulationStudy::new(config).unwrap();
        let a = study.run().unwrap();
        let b = study.run().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.estimation.total, 200);
        assert_eq!(a.coverage.n + a.coverage.excluded, 200);
        assert_eq!(a.coverage.levels.len(), 3);
        assert!(a.to_json().unwrap().contains("\"coverage\""));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_dedicated_pool_matches_sequential() {
        let base = StudyConfig::for_items(&seven_item_pcm()).n_persons(300).seed(8);
        let pooled = SimulationStudy::new(base.clone().threads(2)).unwrap().run().unwrap();
        let seq = SimulationStudy::new(base.parallel(false)).unwrap().run().unwrap();
        assert_eq!(pooled, seq);
    }

    #[test]
    fn test_adjacent_seed_studies_differ() {
        let base = StudyConfig::for_items(&seven_item_pcm())
            .n_persons(300)
            .parallel(false);
        let a = SimulationStudy::new(base.clone().seed(42)).unwrap().run().unwrap();
        let b = SimulationStudy::new(base.seed(43)).unwrap().run().unwrap();
        assert_ne!(a.coverage.accuracy, b.coverage.accuracy);
    }
}
