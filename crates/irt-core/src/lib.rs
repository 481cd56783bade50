//! Core types for Partial Credit Model measurement-error analysis
//!
//! This crate provides the pieces every other irt-sem crate builds on:
//!
//! - **Item parameter store**: [`Item`], [`ItemSet`] and [`load_items`]
//! - **Response patterns**: [`ResponsePattern`], [`ResponseMatrix`]
//! - **Category response functions**: [`pcm`]
//! - **Likelihood/information engine**: [`PatternLikelihood`] and the free
//!   functions [`log_likelihood`], [`score`], [`information`]
//! - **Execution engines**: sequential or Rayon-backed batch maps that keep
//!   results in input order
//!
//! # Example
//!
//! ```rust
//! use irt_core::{Item, ItemSet, ResponsePattern, PatternLikelihood};
//!
//! let items = ItemSet::new(vec![
//!     Item::new("q1", vec![-1.0, 0.0, 1.0]).unwrap(),
//!     Item::new("q2", vec![-0.5, 0.8]).unwrap(),
//! ]).unwrap();
//!
//! let pattern = ResponsePattern::new(&items, vec![Some(2), Some(1)]).unwrap();
//! let lik = PatternLikelihood::new(&items, &pattern).unwrap();
//!
//! let point = lik.evaluate(0.0);
//! assert!(point.information > 0.0);
//! ```

pub mod error;
pub mod execution;
pub mod item;
pub mod likelihood;
pub mod pcm;
pub mod response;

pub use error::{Error, Extreme, Result};
pub use execution::{auto_engine, sequential, ExecutionEngine, ExecutionStrategy, SequentialEngine};
#[cfg(feature = "parallel")]
pub use execution::{parallel, ParallelEngine};
pub use item::{load_items, Item, ItemSet, RawItemRow};
pub use likelihood::{
    expected_score, information, information_curve, log_likelihood, score, test_information,
    theta_grid, InformationPoint, PatternLikelihood, SurfacePoint,
};
pub use pcm::{category_moments, category_probabilities, CategoryMoments};
pub use response::{ResponseMatrix, ResponsePattern};

#[cfg(any(test, feature = "test-utils"))]
pub mod fixtures;
