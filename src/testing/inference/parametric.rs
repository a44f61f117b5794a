//! Parametric tests for a numerical feature split by a binary target.
//!
//! The statistic is oriented like Cohen's d: positive group minus reference
//! group, so a positive t means the positive class has the larger mean.

use crate::testing::utils::GroupSummary;
use crate::testing::{TTestType, TestStatistic};
use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Perform a two-sample t-test comparing `positive` against `reference`.
///
/// Performs either Student's t-test (pooled variance, df = n1 + n2 - 2) or
/// Welch's t-test (unequal variances, Welch-Satterthwaite df).
///
/// # Returns
///
/// `None` when either sample has fewer than two values or the standard error
/// is zero (both samples constant).
pub fn t_test<T>(positive: &[T], reference: &[T], test_type: TTestType) -> Option<TestStatistic>
where
    T: Float,
{
    if positive.len() < 2 || reference.len() < 2 {
        return None;
    }

    let positive = GroupSummary::from_values(positive)?;
    let reference = GroupSummary::from_values(reference)?;
    t_test_from_summaries(&positive, &reference, test_type)
}

/// Perform a t-test using precomputed group summaries.
pub fn t_test_from_summaries(
    positive: &GroupSummary,
    reference: &GroupSummary,
    test_type: TTestType,
) -> Option<TestStatistic> {
    if positive.n < 2 || reference.n < 2 {
        return None;
    }

    let n1 = positive.n as f64;
    let n2 = reference.n as f64;
    let var1 = positive.variance;
    let var2 = reference.variance;
    let mean_diff = positive.mean - reference.mean;

    let (std_err, df) = match test_type {
        TTestType::Student => {
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0);
            ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), n1 + n2 - 2.0)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;

            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            (combined_var.sqrt(), df)
        }
    };

    if std_err.is_nan() || std_err <= 0.0 || !df.is_finite() || df <= 0.0 {
        return None;
    }

    let t_stat = mean_diff / std_err;
    if !t_stat.is_finite() {
        return None;
    }

    Some(TestStatistic::new(t_stat, two_sided_p_value(t_stat, df), df))
}

fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => 2.0 * t_dist.sf(t_stat.abs()),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn clearly_different_groups() {
        let result = t_test(&[7.0, 8.0, 9.0], &[1.0, 2.0, 3.0], TTestType::Student).unwrap();
        // pooled variance 1, se = sqrt(2/3)
        assert_abs_diff_eq!(result.statistic, 6.0 / (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(result.degrees_of_freedom, 4.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn identical_groups() {
        for test_type in [TTestType::Student, TTestType::Welch] {
            let result = t_test(&[4.0, 5.0, 6.0], &[4.0, 5.0, 6.0], test_type).unwrap();
            assert_abs_diff_eq!(result.statistic, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(result.p_value, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn welch_degrees_of_freedom() {
        // var1 = 1 (n=3), var2 = 4 (n=5): terms 1/3 and 4/5
        let positive = [1.0, 2.0, 3.0];
        let reference = [6.0, 6.0, 10.0, 10.0, 8.0];
        let result = t_test(&positive, &reference, TTestType::Welch).unwrap();

        let t1: f64 = 1.0 / 3.0;
        let t2: f64 = 4.0 / 5.0;
        let expected_df = (t1 + t2).powi(2) / (t1 * t1 / 2.0 + t2 * t2 / 4.0);
        assert_abs_diff_eq!(result.degrees_of_freedom, expected_df, epsilon = 1e-12);
        assert!(result.statistic < 0.0);
        assert!(result.p_value > 0.0 && result.p_value < 0.01);
    }

    #[test]
    fn known_p_value() {
        // t = 2.0 with 10 df has two-sided p = 0.07338803
        let positive = GroupSummary { n: 6, mean: 2.0, variance: 3.0 };
        let reference = GroupSummary { n: 6, mean: 0.0, variance: 3.0 };
        let result = t_test_from_summaries(&positive, &reference, TTestType::Student).unwrap();
        assert_abs_diff_eq!(result.statistic, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value, 0.073388, epsilon = 1e-5);
    }

    #[test]
    fn one_constant_group_is_fine_for_welch() {
        let result = t_test(&[5.0, 5.0, 5.0, 5.0], &[1.0, 2.0, 3.0], TTestType::Welch).unwrap();
        assert_eq!(result.degrees_of_freedom, 2.0);
        assert!(result.statistic > 0.0);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(t_test(&[1.0], &[1.0, 2.0], TTestType::Welch).is_none());
        assert!(t_test(&[1.0, 1.0], &[2.0, 2.0], TTestType::Welch).is_none());
        assert!(t_test(&[1.0, 1.0], &[2.0, 2.0], TTestType::Student).is_none());
    }

    #[test]
    fn extreme_statistic_keeps_p_in_range() {
        let result = t_test(&[1000.0, 1000.1, 999.9], &[0.0, 0.1, -0.1], TTestType::Welch).unwrap();
        assert!(result.p_value >= 0.0 && result.p_value < 1e-6);
    }
}
