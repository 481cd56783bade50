//! Partial Credit Model response simulation
//!
//! The seed keys one `ChaCha8` generator and each simulated person reads
//! the stream numbered by their index, so a dataset is bit-identical for a
//! given seed whether persons are drawn sequentially or in parallel.
//! Different seeds give different keys, never a shifted copy of the same
//! streams.

use irt_core::execution::{ExecutionEngine, SequentialEngine};
use irt_core::pcm::category_probabilities_into;
use irt_core::{Error, ItemSet, ResponsePattern, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// One simulated respondent
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPerson {
    /// Generating trait value
    pub theta: f64,
    pub pattern: ResponsePattern,
}

/// Simulated respondents in generation order
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedDataset {
    seed: u64,
    persons: Vec<SimulatedPerson>,
}

impl SimulatedDataset {
    /// Seed that produced the dataset
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn persons(&self) -> &[SimulatedPerson] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Generating trait values, row-aligned with [`patterns`](Self::patterns)
    pub fn thetas(&self) -> Vec<f64> {
        self.persons.iter().map(|p| p.theta).collect()
    }

    pub fn patterns(&self) -> Vec<ResponsePattern> {
        self.persons.iter().map(|p| p.pattern.clone()).collect()
    }

    /// Observed sum score of every person
    pub fn sum_scores(&self) -> Vec<usize> {
        self.persons.iter().map(|p| p.pattern.sum_score()).collect()
    }
}

/// Inverse-CDF draw of a category from normalized probabilities
pub fn draw_category(probs: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    for (k, p) in probs.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return k;
        }
    }
    // Rounding can leave the cumulative sum a hair below 1
    probs.len() - 1
}

/// Draws item responses for a vector of trait values
#[derive(Debug, Clone)]
pub struct ResponseSimulator<'a, E = SequentialEngine> {
    items: &'a ItemSet,
    engine: E,
    seed: Option<u64>,
}

impl<'a> ResponseSimulator<'a, SequentialEngine> {
    /// Create a sequential simulator
    pub fn new(items: &'a ItemSet) -> Self {
        Self {
            items,
            engine: SequentialEngine,
            seed: None,
        }
    }
}

impl<'a, E: ExecutionEngine> ResponseSimulator<'a, E> {
    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Swap the execution engine
    pub fn with_engine<E2: ExecutionEngine>(self, engine: E2) -> ResponseSimulator<'a, E2> {
        ResponseSimulator {
            items: self.items,
            engine,
            seed: self.seed,
        }
    }

    /// Simulate one response pattern per trait value
    #[instrument(skip(self, thetas), fields(n_persons = thetas.len(), n_items = self.items.len()))]
    pub fn simulate(&self, thetas: &[f64]) -> Result<SimulatedDataset> {
        if let Some(i) = thetas.iter().position(|t| !t.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "trait value at index {i} is not finite"
            )));
        }

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(seed, "simulating responses");

        let items = self.items;
        let max_categories = items.iter().map(|it| it.n_categories()).max().unwrap_or(1);

        let persons = self
            .engine
            .execute_batch(thetas.len(), |i| {
                let theta = thetas[i];
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(i as u64);
                let mut probs = vec![0.0; max_categories];
                let responses = items
                    .iter()
                    .map(|item| {
                        let buf = &mut probs[..item.n_categories()];
                        category_probabilities_into(item.thresholds(), theta, buf);
                        Some(draw_category(buf, rng.gen::<f64>()))
                    })
                    .collect();
                ResponsePattern::new(items, responses).map(|pattern| SimulatedPerson { theta, pattern })
            })
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(SimulatedDataset { seed, persons })
    }
}
