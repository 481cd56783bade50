//! Error types for IRT estimation
//!
//! Provides a unified error type for all irt-sem crates.

use thiserror::Error;

/// Which end of the category range a degenerate pattern sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Extreme {
    /// Every observed response is the lowest category
    Minimum,
    /// Every observed response is the highest category
    Maximum,
}

impl std::fmt::Display for Extreme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extreme::Minimum => write!(f, "minimum"),
            Extreme::Maximum => write!(f, "maximum"),
        }
    }
}

/// Core error type for IRT operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed item parameter or response table
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Response references an item the item set does not contain
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// Response category outside the item's category range
    #[error("Category {category} out of range for item {item} ({n_categories} categories)")]
    CategoryOutOfRange {
        item: String,
        category: usize,
        n_categories: usize,
    },

    /// Pattern has no interior likelihood root
    #[error("Degenerate response pattern: every observed response at the {extreme} category")]
    DegenerateResponse { extreme: Extreme },

    /// Root finder hit its iteration cap
    #[error("No convergence after {iterations} iterations (last step {last_step:e})")]
    NonConvergence { iterations: usize, last_step: f64 },

    /// Information is zero at the estimate
    #[error("Standard error undefined at theta = {theta}")]
    UndefinedStandardError { theta: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create a parse error at a table cell
    pub fn parse(row: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            row,
            column,
            message: message.into(),
        }
    }

    /// Short label used when tallying per-pattern failures
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidParameter(_) => "invalid_parameter",
            Error::InvalidInput(_) => "invalid_input",
            Error::Parse { .. } => "parse",
            Error::UnknownItem(_) => "unknown_item",
            Error::CategoryOutOfRange { .. } => "category_out_of_range",
            Error::DegenerateResponse { .. } => "degenerate_response",
            Error::NonConvergence { .. } => "non_convergence",
            Error::UndefinedStandardError { .. } => "undefined_standard_error",
            Error::Computation(_) => "computation",
            Error::Execution(_) => "execution",
            Error::Io(_) => "io",
        }
    }
}
