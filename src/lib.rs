//! # eda-statistics
//!
//! Statistical validation and profiling for exploratory analysis of tabular data.
//!
//! Given an in-memory [`Dataset`](dataset::Dataset) whose columns carry an explicit
//! numerical/categorical tag, this crate tests every requested feature against a
//! target column and reports effect sizes, producing one structured result per
//! feature that a pipeline can serialize or chart.
//!
//! ## Core Features
//!
//! - **Hypothesis Testing**: Welch's or Student's t-test for numerical features
//!   against a binary target, chi-square test of independence for categorical features
//! - **Effect Sizes**: Cohen's d and Hedges' g with negligible/small/medium/large bands
//! - **Multiple Testing Correction**: Bonferroni, Holm and Benjamini-Hochberg
//! - **Profiling**: missing values, duplicate rows, IQR outliers, Pearson correlation
//!
//! ## Quick Start
//!
//! ```
//! use eda_statistics::dataset::{Column, Dataset};
//! use eda_statistics::testing::inference::evaluate;
//!
//! let dataset = Dataset::new(vec![
//!     Column::categorical_from_codes("target", [0, 0, 0, 1, 1, 1].map(Some).to_vec()),
//!     Column::from_f64("score", &[1.0, 2.0, 3.0, 6.0, 7.0, 8.0]),
//! ])
//! .unwrap();
//!
//! let results = evaluate(&dataset, "target", &["score"], 0.05, 0.2).unwrap();
//! assert!(results[0].significant);
//! assert!(results[0].effect_size.unwrap() > 0.0);
//! ```
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Hypothesis tests, effect sizes and multiple testing correction
//! - **[`profiling`]**: Dataset-level quality and correlation checks
//! - **[`dataset`]**: Typed columns and the table they form
//! - **[`config`]**: Serde configuration for validation and profiling

pub mod config;
pub mod dataset;
pub mod error;
pub mod profiling;
pub mod testing;

pub use config::{ProfileConfig, ValidatorConfig};
pub use error::{EdaError, Result};
pub use testing::inference::StatisticalValidator;
