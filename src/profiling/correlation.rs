use ndarray::Array2;
use rayon::prelude::*;

use crate::dataset::{ColumnData, Dataset};
use crate::error::{EdaError, Result};

/// Pearson correlation over rows where both values are present.
///
/// NaN when fewer than two complete pairs remain or either side is constant.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Correlation matrix of the numerical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    /// Column names labelling both axes
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[[i, j]])
    }
}

/// Pairwise-complete Pearson correlation between all numerical columns.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric: Vec<(&str, &[Option<f64>])> = dataset
        .columns()
        .iter()
        .filter_map(|c| c.as_numerical().map(|v| (c.name(), v)))
        .collect();
    let k = numeric.len();

    let upper: Vec<((usize, usize), f64)> = (0..k)
        .flat_map(|i| (i..k).map(move |j| (i, j)))
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(i, j)| ((i, j), pearson_pairwise(numeric[i].1, numeric[j].1)))
        .collect();

    let mut values = Array2::<f64>::from_elem((k, k), f64::NAN);
    for ((i, j), r) in upper {
        values[[i, j]] = r;
        values[[j, i]] = r;
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Correlation of each numerical column with the target, in schema order.
///
/// A numerical target is used as is. A categorical target must have exactly
/// two levels and is encoded 0/1, the positive level being 1 (the greater
/// sorted level unless `positive_label` says otherwise).
pub fn target_correlation(
    dataset: &Dataset,
    target_column: &str,
    positive_label: Option<&str>,
) -> Result<Vec<(String, f64)>> {
    let target = dataset.column(target_column)?;

    let encoded: Vec<Option<f64>> = match target.data() {
        ColumnData::Numerical(values) => values.clone(),
        ColumnData::Categorical(_) => {
            let levels = target.levels();
            if levels.len() != 2 {
                return Err(EdaError::TargetCardinality {
                    column: target_column.to_string(),
                    found: levels.len(),
                    test: "target correlation",
                    required: "a numerical column or exactly 2 levels",
                });
            }
            let positive = match positive_label {
                Some(label) => levels.position(label).ok_or_else(|| EdaError::UnknownPositiveLabel {
                    column: target_column.to_string(),
                    label: label.to_string(),
                })?,
                None => 1,
            };
            levels
                .codes
                .iter()
                .map(|code| code.map(|c| if c == positive { 1.0 } else { 0.0 }))
                .collect()
        }
    };

    Ok(dataset
        .columns()
        .iter()
        .filter(|c| c.name() != target_column)
        .filter_map(|c| {
            c.as_numerical()
                .map(|values| (c.name().to_string(), pearson_pairwise(values, &encoded)))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use approx::assert_abs_diff_eq;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::from_f64("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            Column::from_f64("b", &[2.0, 4.0, 6.0, 8.0, 10.0]),
            Column::from_f64("c", &[5.0, 4.0, 3.0, 2.0, 1.0]),
            Column::from_labels("g", &["x", "x", "y", "y", "y"]),
            Column::from_f64("constant", &[1.0, 1.0, 1.0, 1.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn perfect_correlations() {
        let m = correlation_matrix(&sample());
        assert_eq!(m.columns, vec!["a", "b", "c", "constant"]);
        assert_abs_diff_eq!(m.get("a", "b").unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get("c", "a").unwrap(), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get("b", "b").unwrap(), 1.0, epsilon = 1e-12);
        assert!(m.get("a", "constant").unwrap().is_nan());
        assert!(m.get("a", "g").is_none());
    }

    #[test]
    fn pairwise_complete_rows_only() {
        let x = vec![Some(1.0), Some(2.0), None, Some(4.0)];
        let y = vec![Some(2.0), Some(4.0), Some(100.0), Some(8.0)];
        assert_abs_diff_eq!(pearson_pairwise(&x, &y), 1.0, epsilon = 1e-12);
        assert!(pearson_pairwise(&x[..1], &y[..1]).is_nan());
    }

    #[test]
    fn categorical_target_is_encoded() {
        let ds = sample();
        let corr = target_correlation(&ds, "g", None).unwrap();
        let names: Vec<&str> = corr.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "constant"]);
        assert!(corr[0].1 > 0.8);
        assert_abs_diff_eq!(corr[0].1, -corr[2].1, epsilon = 1e-12);

        let flipped = target_correlation(&ds, "g", Some("x")).unwrap();
        assert_abs_diff_eq!(flipped[0].1, -corr[0].1, epsilon = 1e-12);
    }

    #[test]
    fn numerical_target_excludes_itself() {
        let corr = target_correlation(&sample(), "a", None).unwrap();
        assert_eq!(corr.len(), 3);
        assert_eq!(corr[0].0, "b");
    }

    #[test]
    fn multi_level_categorical_target_is_rejected() {
        let ds = Dataset::new(vec![
            Column::from_f64("a", &[1.0, 2.0, 3.0]),
            Column::from_labels("g", &["x", "y", "z"]),
        ])
        .unwrap();
        assert!(matches!(
            target_correlation(&ds, "g", None),
            Err(EdaError::TargetCardinality { found: 3, .. })
        ));
    }
}
