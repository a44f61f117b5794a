//! Per-feature hypothesis testing against a target column.
//!
//! [`StatisticalValidator`] checks the configuration against the dataset once,
//! then evaluates every requested feature independently:
//!
//! - numerical feature: two-sample t-test between the two target groups, plus
//!   Cohen's d and Hedges' g (positive group minus reference group);
//! - categorical feature: chi-square test of independence on the
//!   feature x target contingency table, no effect size.
//!
//! Problems local to one feature never abort the batch; they are recorded as
//! [`FeatureIssue`]s on that feature's [`TestResult`].

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::dataset::{Column, ColumnKind, Dataset, Levels};
use crate::error::{EdaError, Result};
use crate::testing::effect::{cohens_d_from_summaries, hedges_g};
use crate::testing::utils::{BinaryGroups, GroupSummary, contingency_table, split_groups};
use crate::testing::{CorrectionMethod, FeatureIssue, TestKind, TestResult, correction};

pub mod discrete;

pub mod parametric;

/// Evaluate `feature_columns` against `target_column` with default test settings.
pub fn evaluate(
    dataset: &Dataset,
    target_column: &str,
    feature_columns: &[&str],
    significance_level: f64,
    min_effect_size: f64,
) -> Result<Vec<TestResult>> {
    let config = ValidatorConfig::new(target_column, feature_columns.iter().copied())
        .with_significance_level(significance_level)
        .with_min_effect_size(min_effect_size);
    StatisticalValidator::new(config)?.evaluate(dataset)
}

#[derive(Debug, Clone)]
pub struct StatisticalValidator {
    config: ValidatorConfig,
}

/// Target information resolved once per batch.
struct TargetContext {
    levels: Levels,
    groups: Option<BinaryGroups>,
}

impl StatisticalValidator {
    pub fn new(config: ValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(StatisticalValidator { config })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run every configured test and return one result per feature, in configuration order.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Vec<TestResult>> {
        let (features, target) = self.prepare(dataset)?;

        info!(
            target_column = %self.config.target_column,
            features = features.len(),
            rows = dataset.n_rows(),
            "evaluating features"
        );

        let mut results: Vec<TestResult> = features
            .par_iter()
            .map(|column| self.evaluate_feature(column, &target))
            .collect();

        if let Some(method) = self.config.correction {
            apply_correction(&mut results, method)?;
        }

        let significant = results.iter().filter(|r| r.significant).count();
        let skipped = results.iter().filter(|r| !r.is_computable()).count();
        info!(significant, skipped, "feature evaluation finished");

        Ok(results)
    }

    /// Fail-fast checks: every column exists, the target is not a feature and
    /// has the cardinality each requested test needs.
    fn prepare<'a>(&self, dataset: &'a Dataset) -> Result<(Vec<&'a Column>, TargetContext)> {
        let target_name = &self.config.target_column;
        let target = dataset.column(target_name)?;

        let features = self
            .config
            .feature_columns
            .iter()
            .map(|name| {
                if name == target_name {
                    return Err(EdaError::TargetAsFeature(name.clone()));
                }
                dataset.column(name)
            })
            .collect::<Result<Vec<_>>>()?;

        let levels = target.levels();
        let needs_binary = features.iter().any(|c| c.kind() == ColumnKind::Numerical);
        let needs_categories = features.iter().any(|c| c.kind() == ColumnKind::Categorical);

        if needs_categories && levels.len() < 2 {
            return Err(EdaError::TargetCardinality {
                column: target_name.clone(),
                found: levels.len(),
                test: "chi-square",
                required: "at least 2",
            });
        }

        let groups = if needs_binary {
            if levels.len() != 2 {
                return Err(EdaError::TargetCardinality {
                    column: target_name.clone(),
                    found: levels.len(),
                    test: "t-test",
                    required: "exactly 2",
                });
            }
            Some(resolve_groups(
                target_name,
                &levels,
                self.config.positive_label.as_deref(),
            )?)
        } else {
            None
        };

        Ok((features, TargetContext { levels, groups }))
    }

    fn evaluate_feature(&self, column: &Column, target: &TargetContext) -> TestResult {
        let result = match (column.as_numerical(), &target.groups) {
            (Some(values), Some(groups)) => {
                self.numerical_test(column.name(), values, target, groups)
            }
            _ => self.categorical_test(column, target),
        };

        for issue in &result.issues {
            warn!(feature = %result.feature, kind = %result.kind, ?issue, "feature issue");
        }
        debug!(
            feature = %result.feature,
            kind = %result.kind,
            statistic = ?result.statistic,
            p_value = ?result.p_value,
            effect_size = ?result.effect_size,
            "feature evaluated"
        );

        result.with_significance(self.config.significance_level, self.config.min_effect_size)
    }

    fn numerical_test(
        &self,
        feature: &str,
        values: &[Option<f64>],
        target: &TargetContext,
        groups: &BinaryGroups,
    ) -> TestResult {
        let result = TestResult::new(feature, TestKind::TTest);
        let (reference, positive) = split_groups(values, &target.levels.codes, groups);

        let refr = match group_summary(&groups.reference_label, &reference) {
            Ok(summary) => summary,
            Err(issue) => return result.with_issue(issue),
        };
        let pos = match group_summary(&groups.positive_label, &positive) {
            Ok(summary) => summary,
            Err(issue) => return result.with_issue(issue),
        };

        let mut result = result.with_mean_difference(pos.mean - refr.mean);
        if let Some(stat) = parametric::t_test_from_summaries(&pos, &refr, self.config.t_test) {
            result = result.with_statistic(stat);
        }

        match cohens_d_from_summaries(&pos, &refr) {
            Some(d) => result.with_effect_size(d, hedges_g(d, pos.n, refr.n)),
            None => result.with_issue(FeatureIssue::ZeroVariance),
        }
    }

    fn categorical_test(&self, column: &Column, target: &TargetContext) -> TestResult {
        let result = TestResult::new(column.name(), TestKind::ChiSquare);
        let levels = column.levels();
        let table = contingency_table(
            &levels.codes,
            levels.len(),
            &target.levels.codes,
            target.levels.len(),
        );

        let Some(outcome) = discrete::chi_square_independence(&table, self.config.yates_correction)
        else {
            let (rows, columns) = table.dim();
            return result.with_issue(FeatureIssue::DegenerateTable { rows, columns });
        };

        let cells_below = outcome.cells_below(self.config.min_expected_count);
        let result = result.with_statistic(outcome.test);
        if cells_below > 0 {
            result.with_issue(FeatureIssue::LowReliability {
                min_expected: outcome.min_expected(),
                cells_below,
            })
        } else {
            result
        }
    }
}

/// Summarize one target group, or report it as too small to test.
fn group_summary(
    label: &str,
    sample: &[f64],
) -> std::result::Result<GroupSummary, FeatureIssue> {
    match GroupSummary::from_values(sample) {
        Some(summary) if summary.n >= 2 => Ok(summary),
        _ => Err(FeatureIssue::InsufficientData {
            group: label.to_string(),
            observed: sample.len(),
        }),
    }
}

/// Map the two target levels to reference ("0") and positive ("1") groups.
///
/// Without an explicit label the greater of the two sorted levels is positive.
fn resolve_groups(column: &str, levels: &Levels, positive_label: Option<&str>) -> Result<BinaryGroups> {
    let positive = match positive_label {
        Some(label) => levels
            .position(label)
            .ok_or_else(|| EdaError::UnknownPositiveLabel {
                column: column.to_string(),
                label: label.to_string(),
            })?,
        None => 1,
    };
    let reference = 1 - positive;

    Ok(BinaryGroups {
        reference,
        positive,
        reference_label: levels.names[reference].clone(),
        positive_label: levels.names[positive].clone(),
    })
}

/// Adjust the p-values of computable results; the rest keep `None`.
fn apply_correction(results: &mut [TestResult], method: CorrectionMethod) -> Result<()> {
    let computed: Vec<(usize, f64)> = results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.p_value.map(|p| (i, p)))
        .collect();
    if computed.is_empty() {
        return Ok(());
    }

    let p_values: Vec<f64> = computed.iter().map(|&(_, p)| p).collect();
    let adjusted = correction::adjust_p_values(&p_values, method)?;
    for ((idx, _), adj) in computed.into_iter().zip(adjusted) {
        results[idx].adjusted_p_value = Some(adj);
    }
    Ok(())
}
