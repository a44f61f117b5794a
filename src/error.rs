//! Error types for dataset construction and statistical validation.
//!
//! Everything here is fatal for the whole batch and is raised before any
//! per-feature computation starts. Problems local to one feature are recorded
//! on its [`TestResult`](crate::testing::TestResult) as a
//! [`FeatureIssue`](crate::testing::FeatureIssue) instead.

use thiserror::Error;

/// Result type alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, EdaError>;

#[derive(Error, Debug)]
pub enum EdaError {
    /// Significance level outside the open interval (0, 1).
    #[error("invalid significance level {0}: must lie strictly between 0 and 1")]
    InvalidSignificanceLevel(f64),

    /// Any other out-of-range configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no feature columns were requested")]
    EmptyFeatureList,

    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("target column `{0}` cannot also be evaluated as a feature")]
    TargetAsFeature(String),

    /// Target has the wrong number of distinct values for the requested test.
    #[error("target column `{column}` has {found} distinct values, {test} requires {required}")]
    TargetCardinality {
        column: String,
        found: usize,
        test: &'static str,
        required: &'static str,
    },

    #[error("positive label `{label}` is not a value of target column `{column}`")]
    UnknownPositiveLabel { column: String, label: String },

    #[error("column `{column}` has {got} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("dataset has no columns")]
    EmptyDataset,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
