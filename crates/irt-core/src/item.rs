//! Item parameter store
//!
//! Partial Credit Model items: an identifier plus the threshold locations
//! where adjacent categories are equally probable. An item with `m`
//! thresholds has `m + 1` categories scored `0..=m`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// A single polytomous item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    id: String,
    thresholds: Vec<f64>,
}

impl Item {
    /// Create an item, validating that at least one finite threshold exists
    pub fn new(id: impl Into<String>, thresholds: Vec<f64>) -> Result<Self> {
        let id = id.into();
        if thresholds.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "item {id} has no thresholds"
            )));
        }
        if thresholds.iter().any(|t| !t.is_finite()) {
            return Err(Error::non_finite(&format!("thresholds of item {id}")));
        }
        Ok(Self { id, thresholds })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Number of response categories (thresholds + 1)
    pub fn n_categories(&self) -> usize {
        self.thresholds.len() + 1
    }

    /// Highest category index
    pub fn max_category(&self) -> usize {
        self.thresholds.len()
    }

    /// Location of the item: mean of its thresholds
    pub fn location(&self) -> f64 {
        self.thresholds.iter().sum::<f64>() / self.thresholds.len() as f64
    }

    /// Indices `j` where threshold `j + 1` is not above threshold `j`
    pub fn disordered_thresholds(&self) -> Vec<usize> {
        self.thresholds
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[1] <= w[0])
            .map(|(j, _)| j)
            .collect()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({}, thresholds=[", self.id)?;
        for (i, t) in self.thresholds.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t:.3}")?;
        }
        write!(f, "])")
    }
}

/// Ordered collection of items with unique identifiers
///
/// Shared read-only across every simulation and estimation call of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSet {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl ItemSet {
    /// Build from items; identifiers must be unique
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::InvalidInput("item set is empty".to_string()));
        }
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id.clone(), pos).is_some() {
                return Err(Error::InvalidInput(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
        }
        Ok(Self { items, index })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Position of an item by identifier
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn by_id(&self, id: &str) -> Option<&Item> {
        self.position(id).map(|pos| &self.items[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Highest achievable sum score
    pub fn max_score(&self) -> usize {
        self.items.iter().map(Item::max_category).sum()
    }

    /// Report items whose thresholds are not strictly increasing
    ///
    /// Disordered thresholds are legal under the PCM, so this only logs.
    pub fn validate_ordering(&self) -> Vec<(String, Vec<usize>)> {
        let mut report = Vec::new();
        for item in &self.items {
            let disordered = item.disordered_thresholds();
            if !disordered.is_empty() {
                warn!(item = item.id(), positions = ?disordered, "disordered thresholds");
                report.push((item.id.clone(), disordered));
            }
        }
        report
    }

    /// Like [`validate_ordering`](Self::validate_ordering) but fails on the first disordered item
    pub fn require_ordered(&self) -> Result<()> {
        for item in &self.items {
            if let Some(&j) = item.disordered_thresholds().first() {
                return Err(Error::InvalidParameter(format!(
                    "item {} has disordered thresholds at positions {} and {}",
                    item.id,
                    j,
                    j + 1
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One row of a raw item parameter table
///
/// Cells may be missing (`None`) only at the end of a row; items with fewer
/// thresholds leave their trailing columns empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawItemRow {
    pub id: String,
    pub cells: Vec<Option<f64>>,
}

impl RawItemRow {
    pub fn new(id: impl Into<String>, cells: Vec<Option<f64>>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}

/// Parse a ragged threshold matrix into an [`ItemSet`]
///
/// Column indices in errors are 1-based threshold columns (column 0 is the id).
pub fn load_items(rows: &[RawItemRow]) -> Result<ItemSet> {
    if rows.is_empty() {
        return Err(Error::parse(0, 0, "item parameter table has no rows"));
    }

    let mut items = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        if row.id.trim().is_empty() {
            return Err(Error::parse(r, 0, "empty item id"));
        }

        let mut thresholds = Vec::with_capacity(row.cells.len());
        let mut seen_gap = false;
        for (c, cell) in row.cells.iter().enumerate() {
            match cell {
                None => seen_gap = true,
                Some(_) if seen_gap => {
                    return Err(Error::parse(
                        r,
                        c + 1,
                        "threshold follows a missing cell",
                    ));
                }
                Some(value) if !value.is_finite() => {
                    return Err(Error::parse(r, c + 1, format!("non-finite threshold {value}")));
                }
                Some(value) => thresholds.push(*value),
            }
        }

        if thresholds.is_empty() {
            return Err(Error::parse(r, 1, format!("item {} has no thresholds", row.id)));
        }
        items.push(Item::new(row.id.trim(), thresholds)?);
    }

    ItemSet::new(items).map_err(|e| match e {
        Error::InvalidInput(msg) => Error::parse(0, 0, msg),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<RawItemRow> {
        vec![
            RawItemRow::new("a", vec![Some(-1.0), Some(0.0), Some(1.0)]),
            RawItemRow::new("b", vec![Some(-0.5), Some(0.5), None]),
        ]
    }

    #[test]
    fn test_load_ragged_rows() {
        let set = load_items(&rows()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().n_categories(), 4);
        assert_eq!(set.by_id("b").unwrap().thresholds(), &[-0.5, 0.5]);
        assert_eq!(set.max_score(), 5);
        assert_eq!(set.position("b"), Some(1));
    }

    #[test]
    fn test_row_without_thresholds() {
        let rows = vec![RawItemRow::new("a", vec![None, None])];
        match load_items(&rows) {
            Err(Error::Parse { row, column, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_threshold() {
        let rows = vec![RawItemRow::new("a", vec![Some(0.0), Some(f64::NAN)])];
        assert!(matches!(
            load_items(&rows),
            Err(Error::Parse { column: 2, .. })
        ));
    }

    #[test]
    fn test_interior_gap_rejected() {
        let rows = vec![RawItemRow::new("a", vec![Some(0.0), None, Some(1.0)])];
        assert!(matches!(
            load_items(&rows),
            Err(Error::Parse { column: 3, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let rows = vec![
            RawItemRow::new("a", vec![Some(0.0)]),
            RawItemRow::new("a", vec![Some(1.0)]),
        ];
        assert!(matches!(load_items(&rows), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_disordered_thresholds_reported() {
        let set = ItemSet::new(vec![
            Item::new("ok", vec![-1.0, 1.0]).unwrap(),
            Item::new("bad", vec![0.5, -0.5, 1.0]).unwrap(),
        ])
        .unwrap();

        let report = set.validate_ordering();
        assert_eq!(report, vec![("bad".to_string(), vec![0])]);
        assert!(set.require_ordered().is_err());
    }

    #[test]
    fn test_item_display() {
        let item = Item::new("x", vec![-1.0, 0.25]).unwrap();
        assert_eq!(item.to_string(), "Item(x, thresholds=[-1.000, 0.250])");
        assert!((item.location() + 0.375).abs() < 1e-12);
    }
}
