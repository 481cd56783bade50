//! Coverage evaluation for trait standard errors
//!
//! Given simulated persons with known trait values and their estimates, this
//! crate measures how often `θ̂ ± z·SE` contains the truth at each confidence
//! level, alongside bias, MAE, RMSE and correlation of the point estimates.
//! [`SimulationStudy`] wires simulation, estimation and evaluation together
//! from a JSON-loadable [`StudyConfig`].

pub mod evaluate;
pub mod level;
pub mod study;

pub use evaluate::{
    coverage_from_results, evaluate_coverage, AccuracySummary, CoverageReport, LevelCoverage,
};
pub use level::ConfidenceLevel;
pub use study::{ItemDefinition, SimulationStudy, StudyConfig, StudyReport};
