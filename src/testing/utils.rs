use ndarray::{Array2, Axis};
use num_traits::Float;

/// Count, mean and sample variance (n - 1 denominator) of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
}

impl GroupSummary {
    /// Two-pass summary of `values`. `None` for an empty slice; variance is 0 for a single value.
    pub fn from_values<T: Float>(values: &[T]) -> Option<Self> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mut sum = 0.0;
        for v in values {
            sum += v.to_f64()?;
        }
        let mean = sum / n as f64;

        let variance = if n > 1 {
            let mut ss = 0.0;
            for v in values {
                let d = v.to_f64()? - mean;
                ss += d * d;
            }
            ss / (n - 1) as f64
        } else {
            0.0
        };

        Some(GroupSummary { n, mean, variance })
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Which target levels form the two comparison groups.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryGroups {
    /// Level index of group "0"
    pub reference: usize,
    /// Level index of group "1"
    pub positive: usize,
    pub reference_label: String,
    pub positive_label: String,
}

/// Split a numerical feature into (reference, positive) values.
///
/// Rows where the feature or the target is missing are left out, and so are
/// rows whose target is neither group.
pub fn split_groups(
    values: &[Option<f64>],
    target_codes: &[Option<usize>],
    groups: &BinaryGroups,
) -> (Vec<f64>, Vec<f64>) {
    let mut reference = Vec::new();
    let mut positive = Vec::new();

    for (value, code) in values.iter().zip(target_codes) {
        match (value, code) {
            (Some(v), Some(c)) if *c == groups.reference => reference.push(*v),
            (Some(v), Some(c)) if *c == groups.positive => positive.push(*v),
            _ => {}
        }
    }

    (reference, positive)
}

/// Count feature level x target level co-occurrences over rows where both are present.
///
/// Rows and columns that end up empty are removed, so every margin of the
/// returned table is positive.
pub fn contingency_table(
    feature_codes: &[Option<usize>],
    n_feature_levels: usize,
    target_codes: &[Option<usize>],
    n_target_levels: usize,
) -> Array2<f64> {
    let mut table = Array2::<f64>::zeros((n_feature_levels, n_target_levels));
    for (f, t) in feature_codes.iter().zip(target_codes) {
        if let (Some(f), Some(t)) = (f, t) {
            table[[*f, *t]] += 1.0;
        }
    }

    let keep_rows: Vec<usize> = table
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, row)| row.sum() > 0.0)
        .map(|(i, _)| i)
        .collect();
    let keep_cols: Vec<usize> = table
        .axis_iter(Axis(1))
        .enumerate()
        .filter(|(_, col)| col.sum() > 0.0)
        .map(|(j, _)| j)
        .collect();

    table.select(Axis(0), &keep_rows).select(Axis(1), &keep_cols)
}
