//! CSV tables in and out of the estimation pipeline
//!
//! - [`read_item_parameters`]: ragged threshold table into an [`ItemSet`](irt_core::ItemSet)
//! - [`read_responses`]: response table with item-id header, blank or `NA` for missing
//! - [`write_estimates`], [`write_batch_results`]: per-person `theta, se, status`
//! - [`write_scoring_table`]: sum-score conversion table

pub mod error;
pub mod read;
pub mod write;

pub use error::{IoError, Result};
pub use read::{read_item_parameters, read_responses};
pub use write::{write_batch_results, write_estimates, write_scoring_table};
