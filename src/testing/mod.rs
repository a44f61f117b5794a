use serde::{Deserialize, Serialize};
use std::fmt;

pub mod correction;
pub mod effect;
pub mod inference;

pub mod utils;

pub use effect::EffectSizeCategory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestType {
    Student, // Equal variance
    #[default]
    Welch, // Unequal variance
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    Bonferroni,
    Holm,
    BenjaminiHochberg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestKind {
    #[serde(rename = "t-test")]
    TTest,
    #[serde(rename = "chi-square")]
    ChiSquare,
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::TTest => f.write_str("t-test"),
            TestKind::ChiSquare => f.write_str("chi-square"),
        }
    }
}

/// A non-fatal problem with one feature, kept on that feature's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum FeatureIssue {
    /// A target group has fewer than two usable observations; no statistic.
    InsufficientData { group: String, observed: usize },
    /// Both groups are constant; effect size (and a zero-error t statistic) not computable.
    ZeroVariance,
    /// Fewer than two feature or target levels among the usable rows; no statistic.
    DegenerateTable { rows: usize, columns: usize },
    /// Some expected cell counts fall below the configured minimum.
    LowReliability { min_expected: f64, cells_below: usize },
}

impl FeatureIssue {
    /// Whether the issue prevented the test statistic from being computed.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            FeatureIssue::InsufficientData { .. } | FeatureIssue::DegenerateTable { .. }
        )
    }
}

/// Output of a single test kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestStatistic {
    /// The test statistic value (t or chi-square)
    pub statistic: f64,
    /// Two-sided p-value for t, upper tail for chi-square
    pub p_value: f64,
    pub degrees_of_freedom: f64,
}

impl TestStatistic {
    pub fn new(statistic: f64, p_value: f64, degrees_of_freedom: f64) -> Self {
        TestStatistic {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
            degrees_of_freedom,
        }
    }
}

/// Per-feature outcome of [`inference::StatisticalValidator::evaluate`].
///
/// Values that could not be computed are `None`; the reason is in `issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub feature: String,
    pub kind: TestKind,
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    /// Welch-Satterthwaite, pooled (n1 + n0 - 2) or (rows - 1)(cols - 1)
    pub degrees_of_freedom: Option<f64>,
    /// Mean of the positive group minus mean of the reference group
    pub mean_difference: Option<f64>,
    /// Cohen's d, positive group minus reference group
    pub effect_size: Option<f64>,
    /// Small-sample corrected Cohen's d
    pub hedges_g: Option<f64>,
    pub effect_size_category: Option<EffectSizeCategory>,
    /// `p_value < significance_level`
    pub significant: bool,
    /// Significant and |effect_size| >= the minimum effect size of interest
    pub practically_significant: bool,
    pub adjusted_p_value: Option<f64>,
    pub issues: Vec<FeatureIssue>,
}

impl TestResult {
    /// Create a result with nothing computed yet
    pub fn new(feature: impl Into<String>, kind: TestKind) -> Self {
        TestResult {
            feature: feature.into(),
            kind,
            statistic: None,
            p_value: None,
            degrees_of_freedom: None,
            mean_difference: None,
            effect_size: None,
            hedges_g: None,
            effect_size_category: None,
            significant: false,
            practically_significant: false,
            adjusted_p_value: None,
            issues: Vec::new(),
        }
    }

    /// Fill in the statistic, p-value and degrees of freedom from a kernel
    pub fn with_statistic(mut self, stat: TestStatistic) -> Self {
        self.statistic = Some(stat.statistic);
        self.p_value = Some(stat.p_value);
        self.degrees_of_freedom = Some(stat.degrees_of_freedom);
        self
    }

    /// Add an effect size and derive its category
    pub fn with_effect_size(mut self, cohens_d: f64, hedges_g: f64) -> Self {
        self.effect_size = Some(cohens_d);
        self.hedges_g = Some(hedges_g);
        self.effect_size_category = Some(EffectSizeCategory::from_effect_size(cohens_d));
        self
    }

    pub fn with_mean_difference(mut self, diff: f64) -> Self {
        self.mean_difference = Some(diff);
        self
    }

    pub fn with_issue(mut self, issue: FeatureIssue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Set the significance flags against the given thresholds
    pub fn with_significance(mut self, alpha: f64, min_effect_size: f64) -> Self {
        self.significant = self.is_significant(alpha);
        self.practically_significant = self.significant
            && self
                .effect_size
                .is_some_and(|d| d.abs() >= min_effect_size);
        self
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value.is_some_and(|p| p < alpha)
    }

    /// Whether a test statistic was computed for this feature
    pub fn is_computable(&self) -> bool {
        self.statistic.is_some()
    }

    pub fn is_low_reliability(&self) -> bool {
        self.issues
            .iter()
            .any(|i| matches!(i, FeatureIssue::LowReliability { .. }))
    }
}

/// Indices of results significant at `alpha`, using adjusted p-values where present.
pub fn significant_indices(results: &[TestResult], alpha: f64) -> Vec<usize> {
    results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| match r.adjusted_p_value.or(r.p_value) {
            Some(p) if p < alpha => Some(i),
            _ => None,
        })
        .collect()
}

/// Top `n` computable results by ascending p-value.
pub fn top_features(results: &[TestResult], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.p_value.is_some())
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| {
        let pa = results[a].adjusted_p_value.or(results[a].p_value);
        let pb = results[b].adjusted_p_value.or(results[b].p_value);
        pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(n);
    indices
}
