use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::testing::utils::GroupSummary;

/// Conventional magnitude bands for Cohen's d. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSizeCategory {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectSizeCategory {
    pub const SMALL: f64 = 0.2;
    pub const MEDIUM: f64 = 0.5;
    pub const LARGE: f64 = 0.8;

    /// Classify by |d|: < 0.2 negligible, [0.2, 0.5) small, [0.5, 0.8) medium, >= 0.8 large.
    pub fn from_effect_size(d: f64) -> Self {
        let magnitude = d.abs();
        if magnitude >= Self::LARGE {
            EffectSizeCategory::Large
        } else if magnitude >= Self::MEDIUM {
            EffectSizeCategory::Medium
        } else if magnitude >= Self::SMALL {
            EffectSizeCategory::Small
        } else {
            EffectSizeCategory::Negligible
        }
    }
}

impl fmt::Display for EffectSizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectSizeCategory::Negligible => "negligible",
            EffectSizeCategory::Small => "small",
            EffectSizeCategory::Medium => "medium",
            EffectSizeCategory::Large => "large",
        };
        f.write_str(name)
    }
}

/// Pooled sample standard deviation of two groups.
pub fn pooled_std_dev(a: &GroupSummary, b: &GroupSummary) -> f64 {
    let n1 = a.n as f64;
    let n2 = b.n as f64;
    (((n1 - 1.0) * a.variance + (n2 - 1.0) * b.variance) / (n1 + n2 - 2.0)).sqrt()
}

/// Cohen's d from group summaries: `(mean(positive) - mean(reference)) / pooled_sd`.
///
/// `None` when either group has fewer than two values or the pooled standard
/// deviation is zero.
pub fn cohens_d_from_summaries(positive: &GroupSummary, reference: &GroupSummary) -> Option<f64> {
    if positive.n < 2 || reference.n < 2 {
        return None;
    }

    let pooled_sd = pooled_std_dev(positive, reference);
    if pooled_sd.is_nan() || pooled_sd <= 0.0 {
        return None;
    }

    let d = (positive.mean - reference.mean) / pooled_sd;
    d.is_finite().then_some(d)
}

/// Calculate Cohen's d between two samples, positive group minus reference group.
///
/// Errors when a group has fewer than two values; returns `Ok(None)` when both
/// groups are constant.
pub fn calculate_cohens_d<T: Float>(positive: &[T], reference: &[T]) -> anyhow::Result<Option<f64>> {
    if positive.len() < 2 || reference.len() < 2 {
        return Err(anyhow::anyhow!(
            "Each group must have at least 2 samples for Cohen's d"
        ));
    }

    let positive = GroupSummary::from_values(positive)
        .ok_or_else(|| anyhow::anyhow!("Non-numeric value in positive group"))?;
    let reference = GroupSummary::from_values(reference)
        .ok_or_else(|| anyhow::anyhow!("Non-numeric value in reference group"))?;

    Ok(cohens_d_from_summaries(&positive, &reference))
}

/// Hedges' g: Cohen's d scaled by the small-sample correction factor J.
pub fn hedges_g(d: f64, n1: usize, n2: usize) -> f64 {
    let n = (n1 + n2) as f64;
    let j = 1.0 - 3.0 / (4.0 * (n - 2.0) - 1.0);
    j * d
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cohens_d() {
        // ~8 vs ~2 with sd 0.2 and 0.5
        let high = [8.0, 7.5, 8.5];
        let low = [2.0, 2.2, 1.8];
        let d = calculate_cohens_d(&high, &low).unwrap().unwrap();
        assert_abs_diff_eq!(d, 15.76, epsilon = 0.1);

        // No difference
        let d = calculate_cohens_d(&[5.0, 5.1, 4.9], &[5.0, 5.1, 4.9]).unwrap().unwrap();
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn sign_flips_with_group_swap() {
        let a = [3.0, 3.3, 2.7, 3.1];
        let b = [5.0, 4.7, 5.3, 4.4, 5.6];
        let ab = calculate_cohens_d(&a, &b).unwrap().unwrap();
        let ba = calculate_cohens_d(&b, &a).unwrap().unwrap();
        assert!(ab < 0.0);
        assert_eq!(ab, -ba);
    }

    #[test]
    fn test_small_groups() {
        assert!(calculate_cohens_d(&[1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(calculate_cohens_d(&[1.0, 2.0], &[3.0]).is_err());
    }

    #[test]
    fn test_zero_variance_cases() {
        // constant in both groups: pooled sd is zero
        let d = calculate_cohens_d(&[10.0, 10.0, 10.0], &[5.0, 5.0, 5.0]).unwrap();
        assert!(d.is_none());

        // constant in one group only: still defined
        let d = calculate_cohens_d(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).unwrap().unwrap();
        assert!(d.is_finite());
        assert_abs_diff_eq!(d, 3.0 / 0.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_negative_values() {
        let d = calculate_cohens_d(&[-8.0, -7.5, -8.5], &[-2.0, -2.2, -1.8])
            .unwrap()
            .unwrap();
        assert!(d < 0.0);
        assert_abs_diff_eq!(d.abs(), 15.76, epsilon = 0.1);
    }

    #[test]
    fn test_hedges_g() {
        let d = 1.0;
        let g_small = hedges_g(d, 3, 3);
        let g_large = hedges_g(d, 50, 50);
        assert!(g_small < d);
        assert!(g_large < d);
        assert!(g_large > g_small);
        assert_abs_diff_eq!(g_small, 1.0 - 3.0 / 15.0, epsilon = 1e-12);
    }

    #[test]
    fn category_bands_are_lower_inclusive() {
        use EffectSizeCategory::*;
        assert_eq!(EffectSizeCategory::from_effect_size(0.0), Negligible);
        assert_eq!(EffectSizeCategory::from_effect_size(0.199), Negligible);
        assert_eq!(EffectSizeCategory::from_effect_size(0.2), Small);
        assert_eq!(EffectSizeCategory::from_effect_size(-0.49), Small);
        assert_eq!(EffectSizeCategory::from_effect_size(0.5), Medium);
        assert_eq!(EffectSizeCategory::from_effect_size(0.79), Medium);
        assert_eq!(EffectSizeCategory::from_effect_size(0.8), Large);
        assert_eq!(EffectSizeCategory::from_effect_size(-3.0), Large);
        assert_eq!(Large.to_string(), "large");
    }
}
