//! Reproducible response simulation for the Partial Credit Model
//!
//! Given an [`ItemSet`](irt_core::ItemSet) and a vector of latent trait
//! values, draw one categorical response per person and item from the
//! model's category probabilities.
//!
//! # Example
//!
//! ```rust
//! use irt_core::{Item, ItemSet};
//! use irt_simulate::{ResponseSimulator, TraitDistribution};
//!
//! let items = ItemSet::new(vec![
//!     Item::new("q1", vec![-1.0, 0.0, 1.0]).unwrap(),
//!     Item::new("q2", vec![-0.5, 0.8]).unwrap(),
//! ]).unwrap();
//!
//! let thetas = TraitDistribution::normal(0.0, 1.0).generate(100, 1).unwrap();
//! let data = ResponseSimulator::new(&items)
//!     .with_seed(42)
//!     .simulate(&thetas)
//!     .unwrap();
//!
//! assert_eq!(data.len(), 100);
//! ```

mod simulator;
mod traits;

pub use simulator::{draw_category, ResponseSimulator, SimulatedDataset, SimulatedPerson};
pub use traits::{TraitDistribution, TRAIT_STREAM};
