//! Sum-score to trait conversion tables
//!
//! Under the Partial Credit Model the sum score is sufficient for θ, so every
//! pattern with the same total on a complete test shares one maximum
//! likelihood estimate. The table estimates one representative pattern per
//! score: items are filled in order, each up to its highest category, until
//! the score is used up.
//!
//! The weighted likelihood estimate of a complete pattern depends on the
//! pattern only through its sum score, so the choice of representative does
//! not matter there either.

use crate::config::EstimatorConfig;
use crate::estimator::TraitEstimator;
use crate::types::EstimateStatus;
use irt_core::pcm::category_moments;
use irt_core::{Error, ItemSet, ResponsePattern, Result};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, instrument, warn};

/// Greedy complete pattern with the given sum score
pub fn representative_pattern(items: &ItemSet, sum_score: usize) -> Result<ResponsePattern> {
    let max = items.max_score();
    if sum_score > max {
        return Err(Error::InvalidParameter(format!(
            "sum score {sum_score} exceeds maximum score {max}"
        )));
    }
    let mut remaining = sum_score;
    let responses = items
        .iter()
        .map(|item| {
            let k = remaining.min(item.max_category());
            remaining -= k;
            Some(k)
        })
        .collect();
    ResponsePattern::new(items, responses)
}

/// One line of a scoring table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringTableRow {
    pub sum_score: usize,
    pub theta: f64,
    /// `f64::INFINITY` at the extreme scores
    pub se: f64,
    pub status: EstimateStatus,
    /// Expected score on each item at `theta`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_detail: Option<Vec<f64>>,
}

/// A place where θ̂ failed to increase with the sum score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonotonicityViolation {
    pub sum_score: usize,
    pub theta: f64,
    pub previous_theta: f64,
}

/// Sum-score conversion table, rows in ascending score order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringTable {
    rows: Vec<ScoringTableRow>,
    violations: Vec<MonotonicityViolation>,
}

impl ScoringTable {
    pub fn rows(&self) -> &[ScoringTableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn violations(&self) -> &[MonotonicityViolation] {
        &self.violations
    }

    /// Whether θ̂ never decreases as the sum score increases
    pub fn is_monotone(&self) -> bool {
        self.violations.is_empty()
    }

    /// Row for a sum score, if it is in the table
    pub fn lookup(&self, sum_score: usize) -> Option<&ScoringTableRow> {
        let first = self.rows.first()?.sum_score;
        self.rows
            .get(sum_score.checked_sub(first)?)
            .filter(|row| row.sum_score == sum_score)
    }
}

/// Builder for a [`ScoringTable`]
#[derive(Debug, Clone)]
pub struct ScoringTableBuilder<'a> {
    items: &'a ItemSet,
    config: EstimatorConfig,
    score_range: Option<RangeInclusive<usize>>,
    item_detail: bool,
}

impl<'a> ScoringTableBuilder<'a> {
    pub fn new(items: &'a ItemSet) -> Self {
        Self {
            items,
            config: EstimatorConfig::default(),
            score_range: None,
            item_detail: false,
        }
    }

    /// Restrict the table to these sum scores (default: all of them)
    pub fn score_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.score_range = Some(range);
        self
    }

    /// Add each item's expected score at θ̂ to every row
    pub fn with_item_detail(mut self, detail: bool) -> Self {
        self.item_detail = detail;
        self
    }

    pub fn estimator_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    #[instrument(skip(self), fields(n_items = self.items.len()))]
    pub fn build(self) -> Result<ScoringTable> {
        let max = self.items.max_score();
        let range = self.score_range.clone().unwrap_or(0..=max);
        if range.is_empty() || *range.end() > max {
            return Err(Error::InvalidParameter(format!(
                "score range {}..={} must lie within 0..={max}",
                range.start(),
                range.end()
            )));
        }

        let estimator = TraitEstimator::new(self.config)?;
        let mut rows = Vec::with_capacity(range.clone().count());
        for sum_score in range {
            let pattern = representative_pattern(self.items, sum_score)?;
            let estimate = estimator.estimate(self.items, &pattern)?;
            let item_detail = self.item_detail.then(|| {
                self.items
                    .iter()
                    .map(|item| category_moments(item.thresholds(), estimate.theta).mean)
                    .collect()
            });
            rows.push(ScoringTableRow {
                sum_score,
                theta: estimate.theta,
                se: estimate.se,
                status: estimate.status,
                item_detail,
            });
        }

        let violations = find_violations(&rows);
        for v in &violations {
            warn!(
                sum_score = v.sum_score,
                theta = v.theta,
                previous_theta = v.previous_theta,
                "scoring table is not monotone"
            );
        }
        debug!(rows = rows.len(), "scoring table built");

        Ok(ScoringTable { rows, violations })
    }
}

fn find_violations(rows: &[ScoringTableRow]) -> Vec<MonotonicityViolation> {
    rows.windows(2)
        .filter(|pair| pair[1].theta < pair[0].theta)
        .map(|pair| MonotonicityViolation {
            sum_score: pair[1].sum_score,
            theta: pair[1].theta,
            previous_theta: pair[0].theta,
        })
        .collect()
}
