use num_traits::Float;

use crate::dataset::Dataset;

/// Quantile of sorted data by linear interpolation between closest ranks.
///
/// `q` is clamped to [0, 1]. Returns `None` for empty input.
pub fn quantile_sorted<T: Float>(sorted: &[T], q: f64) -> Option<T> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = T::from(pos - lower as f64)?;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Tukey fences `[Q1 - k * IQR, Q3 + k * IQR]` of the non-missing values.
pub fn iqr_bounds(values: &[Option<f64>], multiplier: f64) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Count values strictly outside the IQR fences.
pub fn count_outliers(values: &[Option<f64>], multiplier: f64) -> usize {
    let Some((lower, upper)) = iqr_bounds(values, multiplier) else {
        return 0;
    };
    values
        .iter()
        .flatten()
        .filter(|&&v| v < lower || v > upper)
        .count()
}

/// Outlier count for every numerical column, in schema order.
pub fn outlier_counts(dataset: &Dataset, multiplier: f64) -> Vec<(String, usize)> {
    dataset
        .columns()
        .iter()
        .filter_map(|column| {
            column
                .as_numerical()
                .map(|values| (column.name().to_string(), count_outliers(values, multiplier)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.25).unwrap(), 1.75, epsilon = 1e-12);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 0.5).unwrap(), 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(quantile_sorted(&sorted, 1.0).unwrap(), 4.0, epsilon = 1e-12);
        assert!(quantile_sorted::<f64>(&[], 0.5).is_none());
    }

    #[test]
    fn counts_values_beyond_fences() {
        let mut values: Vec<Option<f64>> = (1..=9).map(|v| Some(v as f64)).collect();
        values.push(Some(100.0));
        values.push(None);
        // q1 = 3.25, q3 = 7.75, fences -3.5 / 14.5
        let (lower, upper) = iqr_bounds(&values, 1.5).unwrap();
        assert_abs_diff_eq!(lower, -3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(upper, 14.5, epsilon = 1e-12);
        assert_eq!(count_outliers(&values, 1.5), 1);
    }

    #[test]
    fn only_numerical_columns_are_checked() {
        let ds = Dataset::new(vec![
            Column::from_f64("x", &[1.0, 1.0, 1.0, 50.0]),
            Column::from_labels("g", &["a", "b", "c", "d"]),
        ])
        .unwrap();
        let counts = outlier_counts(&ds, 1.5);
        assert_eq!(counts, vec![("x".to_string(), 1)]);
    }
}
