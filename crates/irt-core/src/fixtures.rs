//! Calibrated item sets for tests, benchmarks and demos
//!
//! These are standardized parameter sets so that every crate's tests exercise
//! the same measurement model.

use crate::{Item, ItemSet};

/// Threshold table of a seven-item, five-category stress questionnaire
pub const SEVEN_ITEM_THRESHOLDS: [(&str, [f64; 4]); 7] = [
    ("stress1", [-2.1, -0.9, 0.3, 1.6]),
    ("stress2", [-1.7, -0.6, 0.5, 1.9]),
    ("stress3", [-2.4, -1.1, 0.1, 1.2]),
    ("stress4", [-1.3, -0.2, 0.9, 2.2]),
    ("stress5", [-1.9, -0.4, 0.6, 1.7]),
    ("stress6", [-2.6, -1.3, -0.1, 1.0]),
    ("stress7", [-1.5, -0.5, 0.8, 2.0]),
];

/// Seven PCM items scored 0..=4, maximum sum score 28
pub fn seven_item_pcm() -> ItemSet {
    let items = SEVEN_ITEM_THRESHOLDS
        .iter()
        .map(|(id, t)| Item::new(*id, t.to_vec()).unwrap())
        .collect();
    ItemSet::new(items).unwrap()
}

/// Three short items with unequal category counts, maximum sum score 7
pub fn mixed_length_items() -> ItemSet {
    ItemSet::new(vec![
        Item::new("short", vec![0.2]).unwrap(),
        Item::new("medium", vec![-0.8, 0.9]).unwrap(),
        Item::new("long", vec![-1.6, -0.4, 0.7, 1.8]).unwrap(),
    ])
    .unwrap()
}
