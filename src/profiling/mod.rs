//! Dataset-level descriptive checks that run before any hypothesis testing.
//!
//! ## Available Checks
//!
//! - **Missing values** (`quality`): fraction of missing cells per column
//! - **Duplicates** (`quality`): rows repeating an earlier row
//! - **Outliers** (`outliers`): Tukey IQR fences per numerical column
//! - **Correlation** (`correlation`): Pearson matrix and feature-target ranking
//!
//! [`profile`] bundles all of them after dropping identifier columns.

use tracing::info;

use crate::config::ProfileConfig;
use crate::dataset::Dataset;
use crate::error::Result;

pub mod correlation;
pub mod outliers;
pub mod quality;

pub use correlation::{CorrelationMatrix, correlation_matrix, target_correlation};
pub use outliers::outlier_counts;
pub use quality::{duplicate_row_count, missing_value_fractions};

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetProfile {
    pub n_rows: usize,
    pub n_columns: usize,
    pub numerical_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub missing_values: Vec<(String, f64)>,
    pub duplicate_rows: usize,
    /// `None` when outlier detection is disabled
    pub outliers: Option<Vec<(String, usize)>>,
    pub correlation: Option<CorrelationMatrix>,
    pub target_correlation: Option<Vec<(String, f64)>>,
}

/// Profile `dataset` after dropping the configured id columns.
pub fn profile(dataset: &Dataset, config: &ProfileConfig) -> Result<DatasetProfile> {
    config.validate()?;
    let dataset = dataset.without_columns(&config.id_columns);

    let missing_values = missing_value_fractions(&dataset);
    let duplicate_rows = duplicate_row_count(&dataset);
    info!(
        rows = dataset.n_rows(),
        columns = dataset.n_columns(),
        duplicate_rows,
        columns_with_missing = missing_values.len(),
        "profiled dataset"
    );

    let outliers = config
        .outlier_detection
        .then(|| outlier_counts(&dataset, config.iqr_multiplier));

    let correlation = config.correlation.then(|| correlation_matrix(&dataset));

    let target_correlation = match (&config.target_column, config.correlation) {
        (Some(target), true) => Some(target_correlation(
            &dataset,
            target,
            config.positive_label.as_deref(),
        )?),
        _ => None,
    };

    Ok(DatasetProfile {
        n_rows: dataset.n_rows(),
        n_columns: dataset.n_columns(),
        numerical_columns: dataset.numerical_columns().into_iter().map(String::from).collect(),
        categorical_columns: dataset.categorical_columns().into_iter().map(String::from).collect(),
        missing_values,
        duplicate_rows,
        outliers,
        correlation,
        target_correlation,
    })
}
