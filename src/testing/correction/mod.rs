//! Multiple testing correction for a batch of per-feature p-values.

use anyhow::{Result, anyhow};
use std::cmp::Ordering;

use crate::testing::CorrectionMethod;

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }

    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }
    Ok(())
}

/// Indices of `p_values` in ascending p-value order.
fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Adjust p-values with the given method.
pub fn adjust_p_values(p_values: &[f64], method: CorrectionMethod) -> Result<Vec<f64>> {
    match method {
        CorrectionMethod::Bonferroni => bonferroni_correction(p_values),
        CorrectionMethod::Holm => holm_bonferroni_correction(p_values),
        CorrectionMethod::BenjaminiHochberg => benjamini_hochberg_correction(p_values),
    }
}

/// Apply Bonferroni correction to p-values
///
/// Multiplies each p-value by the number of tests, capped at 1.
///
/// # Example
/// ```
/// use eda_statistics::testing::correction::bonferroni_correction;
///
/// let adjusted = bonferroni_correction(&[0.01, 0.03, 0.5]).unwrap();
/// assert!((adjusted[1] - 0.09).abs() < 1e-12);
/// assert_eq!(adjusted[2], 1.0);
/// ```
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len() as f64;

    Ok(p_values.iter().map(|&p| (p * n).min(1.0)).collect())
}

/// Apply the Holm-Bonferroni step-down procedure
///
/// Controls the family-wise error rate and is uniformly more powerful than
/// plain Bonferroni. The i-th smallest p-value (0-based) is multiplied by
/// `n - i`, and adjusted values are made monotone non-decreasing in rank.
pub fn holm_bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let mut adjusted = vec![0.0; n];
    let mut running_max: f64 = 0.0;

    for (rank, &idx) in ascending_order(p_values).iter().enumerate() {
        let value = (p_values[idx] * (n - rank) as f64).min(1.0);
        running_max = running_max.max(value);
        adjusted[idx] = running_max;
    }

    Ok(adjusted)
}

/// Apply the Benjamini-Hochberg procedure for controlling false discovery rate
///
/// # Example
/// ```
/// use eda_statistics::testing::correction::benjamini_hochberg_correction;
///
/// let adjusted = benjamini_hochberg_correction(&[0.01, 0.04, 0.03]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[1] - 0.04).abs() < 1e-12);
/// assert!((adjusted[2] - 0.04).abs() < 1e-12);
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();
    let order = ascending_order(p_values);

    let mut adjusted = vec![0.0; n];
    let mut current_min: f64 = 1.0;

    // Process from largest to smallest p-value
    for i in (0..n).rev() {
        let idx = order[i];
        let rank = i + 1;

        let value = (p_values[idx] * n as f64 / rank as f64).min(1.0);
        current_min = current_min.min(value);
        adjusted[idx] = current_min;
    }

    Ok(adjusted)
}
