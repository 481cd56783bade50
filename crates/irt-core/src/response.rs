//! Response patterns
//!
//! A pattern is stored positionally, aligned with the [`ItemSet`] it was
//! validated against: entry `i` is the category observed on item `i`, or
//! `None` when the response is missing.

use crate::error::Extreme;
use crate::{Error, ItemSet, Result};
use serde::Serialize;

/// Observed categories of one respondent
///
/// Not deserializable: a pattern only exists once checked against an item set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResponsePattern {
    responses: Vec<Option<usize>>,
}

impl ResponsePattern {
    /// Build from positional responses, checking ranges against `items`
    pub fn new(items: &ItemSet, responses: Vec<Option<usize>>) -> Result<Self> {
        check_responses(items, &responses)?;
        Ok(Self { responses })
    }

    /// Check that this pattern fits `items`, position by position
    pub fn validate(&self, items: &ItemSet) -> Result<()> {
        check_responses(items, &self.responses)
    }

    /// Build from `(item id, category)` pairs; unlisted items are missing
    pub fn from_pairs<'a, I>(items: &ItemSet, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<usize>)>,
    {
        let mut responses = vec![None; items.len()];
        for (id, category) in pairs {
            let pos = items
                .position(id)
                .ok_or_else(|| Error::UnknownItem(id.to_string()))?;
            responses[pos] = category;
        }
        Self::new(items, responses)
    }

    /// Pattern with the same category on every item, capped at each item's maximum
    pub fn uniform(items: &ItemSet, category: usize) -> Self {
        Self {
            responses: items
                .iter()
                .map(|item| Some(category.min(item.max_category())))
                .collect(),
        }
    }

    pub fn responses(&self) -> &[Option<usize>] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<usize> {
        self.responses.get(position).copied().flatten()
    }

    /// Number of non-missing responses
    pub fn n_observed(&self) -> usize {
        self.responses.iter().filter(|r| r.is_some()).count()
    }

    /// Sum of observed categories
    pub fn sum_score(&self) -> usize {
        self.responses.iter().flatten().sum()
    }

    /// Maximum sum score attainable on the observed items
    pub fn max_observed_score(&self, items: &ItemSet) -> usize {
        items
            .iter()
            .zip(&self.responses)
            .filter(|(_, r)| r.is_some())
            .map(|(item, _)| item.max_category())
            .sum()
    }

    /// `Some` when every observed response sits at the bottom or top category
    pub fn extreme(&self, items: &ItemSet) -> Option<Extreme> {
        if self.n_observed() == 0 {
            return None;
        }
        let score = self.sum_score();
        if score == 0 {
            Some(Extreme::Minimum)
        } else if score == self.max_observed_score(items) {
            Some(Extreme::Maximum)
        } else {
            None
        }
    }

    /// Iterate `(item position, category)` over observed responses
    pub fn observed(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.responses
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.map(|k| (i, k)))
    }
}

fn check_responses(items: &ItemSet, responses: &[Option<usize>]) -> Result<()> {
    if responses.len() != items.len() {
        return Err(Error::size_mismatch(
            items.len(),
            responses.len(),
            "response pattern",
        ));
    }
    for (item, response) in items.iter().zip(responses) {
        if let Some(category) = *response {
            if category >= item.n_categories() {
                return Err(Error::CategoryOutOfRange {
                    item: item.id().to_string(),
                    category,
                    n_categories: item.n_categories(),
                });
            }
        }
    }
    Ok(())
}

/// Response patterns aligned by row with an external data table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseMatrix {
    rows: Vec<ResponsePattern>,
}

impl ResponseMatrix {
    pub fn new(rows: Vec<ResponsePattern>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ResponsePattern] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<ResponsePattern> {
        self.rows
    }
}
