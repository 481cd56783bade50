//! Estimation over many response patterns
//!
//! A failure on one pattern never aborts the batch: every input row gets its
//! own `Result`, kept in input order, and [`BatchSummary`] tallies what
//! happened.

use crate::estimator::TraitEstimator;
use crate::types::{EstimateStatus, TraitEstimate};
use irt_core::execution::{ExecutionEngine, SequentialEngine};
use irt_core::{ItemSet, ResponsePattern, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Per-pattern results in input order
#[derive(Debug)]
pub struct BatchEstimates {
    results: Vec<Result<TraitEstimate>>,
}

/// Counts over a batch of estimates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub interior: usize,
    pub extreme: usize,
    pub clamped: usize,
    /// Failures keyed by [`irt_core::Error::kind`]
    pub failures: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

impl BatchEstimates {
    pub fn results(&self) -> &[Result<TraitEstimate>] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successful estimates with their input index
    pub fn estimates(&self) -> impl Iterator<Item = (usize, &TraitEstimate)> + '_ {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().ok().map(|e| (i, e)))
    }

    pub fn into_results(self) -> Vec<Result<TraitEstimate>> {
        self.results
    }

    /// All estimates, or the first failure
    pub fn into_estimates(self) -> Result<Vec<TraitEstimate>> {
        self.results.into_iter().collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.results.len(),
            ..BatchSummary::default()
        };
        for result in &self.results {
            match result {
                Ok(estimate) => {
                    summary.succeeded += 1;
                    match estimate.status {
                        EstimateStatus::Interior => summary.interior += 1,
                        EstimateStatus::Extreme(_) => summary.extreme += 1,
                        EstimateStatus::Clamped(_) => summary.clamped += 1,
                    }
                }
                Err(e) => *summary.failures.entry(e.kind()).or_insert(0) += 1,
            }
        }
        summary
    }
}

/// Applies a [`TraitEstimator`] to every pattern through an execution engine
#[derive(Debug, Clone)]
pub struct BatchEstimator<E = SequentialEngine> {
    engine: E,
    estimator: TraitEstimator,
}

impl BatchEstimator<SequentialEngine> {
    pub fn sequential(estimator: TraitEstimator) -> Self {
        Self::new(SequentialEngine, estimator)
    }
}

impl<E: ExecutionEngine> BatchEstimator<E> {
    pub fn new(engine: E, estimator: TraitEstimator) -> Self {
        Self { engine, estimator }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn estimator(&self) -> &TraitEstimator {
        &self.estimator
    }

    #[instrument(
        skip_all,
        fields(
            n_patterns = patterns.len(),
            strategy = ?self.engine.strategy(),
            threads = self.engine.num_threads(),
        )
    )]
    pub fn estimate_all(&self, items: &ItemSet, patterns: &[ResponsePattern]) -> BatchEstimates {
        let estimator = &self.estimator;
        let results = self
            .engine
            .execute_batch(patterns.len(), |i| estimator.estimate(items, &patterns[i]));
        let estimates = BatchEstimates { results };

        let summary = estimates.summary();
        debug!(
            succeeded = summary.succeeded,
            extreme = summary.extreme,
            clamped = summary.clamped,
            "batch estimation finished"
        );
        if summary.failed() > 0 {
            warn!(failed = summary.failed(), failures = ?summary.failures, "some patterns could not be estimated");
        }
        estimates
    }
}
