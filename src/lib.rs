//! Measurement-error evaluation for Partial Credit Model scoring
//!
//! Facade over the workspace crates:
//!
//! - [`irt_core`]: item parameters, response patterns, likelihood surfaces
//! - [`irt_simulate`]: reproducible response simulation
//! - [`irt_estimate`]: weighted likelihood estimates, standard errors, scoring tables
//! - [`irt_coverage`]: interval coverage and simulation studies
//! - [`irt_io`]: CSV readers and writers
//!
//! The [`prelude`] pulls in the names a typical pipeline needs.

pub use irt_core;
pub use irt_coverage;
pub use irt_estimate;
pub use irt_io;
pub use irt_simulate;

pub mod prelude {
    pub use irt_core::{
        auto_engine, sequential, Error, ExecutionEngine, Extreme, Item, ItemSet, ResponsePattern,
        Result,
    };
    pub use irt_coverage::{
        coverage_from_results, evaluate_coverage, ConfidenceLevel, CoverageReport,
        SimulationStudy, StudyConfig,
    };
    pub use irt_estimate::{
        BatchEstimator, EstimateStatus, EstimatorConfig, ScoringTableBuilder, SeMethod,
        TraitEstimate, TraitEstimator,
    };
    pub use irt_simulate::{ResponseSimulator, TraitDistribution};
}
