//! Trait estimation for Partial Credit Model response patterns
//!
//! This crate turns response patterns into trait estimates with standard
//! errors:
//!
//! - [`ThetaEstimator`]: Warm's weighted likelihood (or plain maximum
//!   likelihood) solved by bracketed Newton iteration
//! - [`StandardErrorEstimator`]: inverse square root of the curvature at the
//!   estimate, with an infinite sentinel where it is undefined
//! - [`TraitEstimator`]: both in one call
//! - [`BatchEstimator`]: many patterns through an execution engine, with
//!   per-pattern failures kept separate
//! - [`ScoringTableBuilder`]: sum score to θ̂ conversion tables
//!
//! # Example
//!
//! ```rust
//! use irt_core::{Item, ItemSet, ResponsePattern};
//! use irt_estimate::{EstimatorConfig, TraitEstimator};
//!
//! let items = ItemSet::new(vec![
//!     Item::new("q1", vec![-1.0, 0.5]).unwrap(),
//!     Item::new("q2", vec![-0.5, 1.0]).unwrap(),
//! ])
//! .unwrap();
//! let pattern = ResponsePattern::new(&items, vec![Some(1), Some(2)]).unwrap();
//!
//! let estimator = TraitEstimator::new(EstimatorConfig::new().range(-5.0, 5.0)).unwrap();
//! let estimate = estimator.estimate(&items, &pattern).unwrap();
//! assert!(estimate.se.is_finite());
//! ```

pub mod batch;
pub mod config;
pub mod estimator;
pub mod scoring_table;
pub mod standard_error;
pub mod theta;
pub mod types;

pub use batch::{BatchEstimates, BatchEstimator, BatchSummary};
pub use config::{EstimationMethod, EstimatorConfig, SeMethod};
pub use estimator::TraitEstimator;
pub use scoring_table::{
    representative_pattern, MonotonicityViolation, ScoringTable, ScoringTableBuilder,
    ScoringTableRow,
};
pub use standard_error::StandardErrorEstimator;
pub use theta::ThetaEstimator;
pub use types::{Bound, EstimateStatus, ThetaSolution, TraitEstimate};
