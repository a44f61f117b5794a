//! Configuration values for statistical validation and dataset profiling.
//!
//! Both types are plain serde values. Reading them from YAML, TOML or the
//! environment is left to the calling pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{EdaError, Result};
use crate::testing::{CorrectionMethod, TTestType};

pub const DEFAULT_SIGNIFICANCE_LEVEL: f64 = 0.05;
pub const DEFAULT_MIN_EFFECT_SIZE: f64 = 0.2;
pub const DEFAULT_MIN_EXPECTED_COUNT: f64 = 5.0;
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

fn default_significance_level() -> f64 {
    DEFAULT_SIGNIFICANCE_LEVEL
}

fn default_min_effect_size() -> f64 {
    DEFAULT_MIN_EFFECT_SIZE
}

fn default_min_expected_count() -> f64 {
    DEFAULT_MIN_EXPECTED_COUNT
}

fn default_iqr_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Column whose levels define the comparison groups
    pub target_column: String,
    /// Columns to test, in output order
    pub feature_columns: Vec<String>,
    #[serde(default = "default_significance_level")]
    pub significance_level: f64,
    /// Smallest |Cohen's d| considered practically relevant
    #[serde(default = "default_min_effect_size")]
    pub min_effect_size: f64,
    #[serde(default)]
    pub t_test: TTestType,
    /// Target level treated as group "1" in Cohen's d. Defaults to the greater
    /// of the two sorted levels.
    #[serde(default)]
    pub positive_label: Option<String>,
    /// Continuity correction for chi-square tables with one degree of freedom
    #[serde(default = "default_true")]
    pub yates_correction: bool,
    /// Expected cell count below which a chi-square result is flagged
    #[serde(default = "default_min_expected_count")]
    pub min_expected_count: f64,
    #[serde(default)]
    pub correction: Option<CorrectionMethod>,
}

impl ValidatorConfig {
    pub fn new<S: Into<String>>(
        target_column: impl Into<String>,
        feature_columns: impl IntoIterator<Item = S>,
    ) -> Self {
        ValidatorConfig {
            target_column: target_column.into(),
            feature_columns: feature_columns.into_iter().map(Into::into).collect(),
            significance_level: DEFAULT_SIGNIFICANCE_LEVEL,
            min_effect_size: DEFAULT_MIN_EFFECT_SIZE,
            t_test: TTestType::default(),
            positive_label: None,
            yates_correction: true,
            min_expected_count: DEFAULT_MIN_EXPECTED_COUNT,
            correction: None,
        }
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    pub fn with_min_effect_size(mut self, min_effect_size: f64) -> Self {
        self.min_effect_size = min_effect_size;
        self
    }

    pub fn with_t_test(mut self, test_type: TTestType) -> Self {
        self.t_test = test_type;
        self
    }

    pub fn with_positive_label(mut self, label: impl Into<String>) -> Self {
        self.positive_label = Some(label.into());
        self
    }

    pub fn with_yates_correction(mut self, enabled: bool) -> Self {
        self.yates_correction = enabled;
        self
    }

    pub fn with_min_expected_count(mut self, count: f64) -> Self {
        self.min_expected_count = count;
        self
    }

    pub fn with_correction(mut self, method: CorrectionMethod) -> Self {
        self.correction = Some(method);
        self
    }

    /// Check the values that do not depend on a dataset.
    pub fn validate(&self) -> Result<()> {
        let alpha = self.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(EdaError::InvalidSignificanceLevel(alpha));
        }
        if !self.min_effect_size.is_finite() || self.min_effect_size < 0.0 {
            return Err(EdaError::InvalidParameter(format!(
                "min_effect_size must be finite and non-negative, got {}",
                self.min_effect_size
            )));
        }
        if !self.min_expected_count.is_finite() || self.min_expected_count <= 0.0 {
            return Err(EdaError::InvalidParameter(format!(
                "min_expected_count must be positive, got {}",
                self.min_expected_count
            )));
        }
        if self.feature_columns.is_empty() {
            return Err(EdaError::EmptyFeatureList);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Identifier columns dropped before profiling
    #[serde(default)]
    pub id_columns: Vec<String>,
    #[serde(default = "default_true")]
    pub outlier_detection: bool,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    #[serde(default = "default_true")]
    pub correlation: bool,
    /// Target for the feature-target correlation ranking
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub positive_label: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            id_columns: Vec::new(),
            outlier_detection: true,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            correlation: true,
            target_column: None,
            positive_label: None,
        }
    }
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(EdaError::InvalidParameter(format!(
                "iqr_multiplier must be finite and non-negative, got {}",
                self.iqr_multiplier
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in_missing_keys() {
        let config: ValidatorConfig = serde_json::from_str(
            r#"{ "target_column": "churn", "feature_columns": ["age", "plan"] }"#,
        )
        .unwrap();

        assert_eq!(config, ValidatorConfig::new("churn", ["age", "plan"]));
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.min_effect_size, 0.2);
        assert_eq!(config.t_test, TTestType::Welch);
        assert!(config.yates_correction);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn options_deserialize_in_snake_case() {
        let config: ValidatorConfig = serde_json::from_str(
            r#"{
                "target_column": "y",
                "feature_columns": ["x"],
                "significance_level": 0.01,
                "t_test": "student",
                "positive_label": "yes",
                "correction": "benjamini_hochberg"
            }"#,
        )
        .unwrap();

        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.t_test, TTestType::Student);
        assert_eq!(config.positive_label.as_deref(), Some("yes"));
        assert_eq!(config.correction, Some(CorrectionMethod::BenjaminiHochberg));
    }

    #[test]
    fn significance_level_must_be_open_unit_interval() {
        for alpha in [0.0, 1.0, -0.1, 2.0, f64::NAN] {
            let err = ValidatorConfig::new("y", ["x"])
                .with_significance_level(alpha)
                .validate()
                .unwrap_err();
            assert!(matches!(err, EdaError::InvalidSignificanceLevel(_)));
        }
    }

    #[test]
    fn empty_feature_list_is_rejected() {
        let config = ValidatorConfig::new("y", Vec::<String>::new());
        assert!(matches!(config.validate(), Err(EdaError::EmptyFeatureList)));
    }

    #[test]
    fn negative_effect_threshold_is_rejected() {
        let config = ValidatorConfig::new("y", ["x"]).with_min_effect_size(-0.1);
        assert!(matches!(config.validate(), Err(EdaError::InvalidParameter(_))));
    }

    #[test]
    fn profile_defaults() {
        let config: ProfileConfig = serde_json::from_str(r#"{ "id_columns": ["id"] }"#).unwrap();
        assert_eq!(config.id_columns, vec!["id"]);
        assert!(config.outlier_detection);
        assert_eq!(config.iqr_multiplier, 1.5);
        assert!(config.validate().is_ok());
    }
}
