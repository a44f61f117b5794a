use crate::testing::TestStatistic;
use ndarray::{Array2, Axis};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Outcome of a chi-square test of independence.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareOutcome {
    pub test: TestStatistic,
    /// Expected counts under independence, same shape as the observed table
    pub expected: Array2<f64>,
}

impl ChiSquareOutcome {
    pub fn min_expected(&self) -> f64 {
        self.expected.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Number of cells whose expected count is below `threshold`.
    pub fn cells_below(&self, threshold: f64) -> usize {
        self.expected.iter().filter(|&&e| e < threshold).count()
    }
}

/// Expected cell counts under independence: row_sum * col_sum / total.
pub fn expected_frequencies(observed: &Array2<f64>) -> Array2<f64> {
    let row_sums = observed.sum_axis(Axis(1));
    let col_sums = observed.sum_axis(Axis(0));
    let total = observed.sum();

    Array2::from_shape_fn(observed.dim(), |(i, j)| row_sums[i] * col_sums[j] / total)
}

/// Performs a chi-square test of independence on an r x c contingency table.
///
/// With `yates` set, tables with one degree of freedom get the continuity
/// correction: each |observed - expected| is reduced by min(0.5, |observed - expected|).
///
/// Returns `None` for tables with fewer than two rows or columns, or with an
/// empty row, column or total.
pub fn chi_square_independence(observed: &Array2<f64>, yates: bool) -> Option<ChiSquareOutcome> {
    let (rows, cols) = observed.dim();
    if rows < 2 || cols < 2 {
        return None;
    }
    if observed.iter().any(|&v| v < 0.0 || !v.is_finite()) {
        return None;
    }
    if observed.sum_axis(Axis(0)).iter().any(|&s| s <= 0.0)
        || observed.sum_axis(Axis(1)).iter().any(|&s| s <= 0.0)
    {
        return None;
    }

    let expected = expected_frequencies(observed);
    let df = ((rows - 1) * (cols - 1)) as f64;
    let correct = yates && rows == 2 && cols == 2;

    let chi_square: f64 = observed
        .iter()
        .zip(expected.iter())
        .map(|(&o, &e)| {
            let mut diff = (o - e).abs();
            if correct {
                diff -= diff.min(0.5);
            }
            diff * diff / e
        })
        .sum();

    let p_value = match ChiSquared::new(df) {
        Ok(chi_dist) => chi_dist.sf(chi_square),
        Err(_) => 1.0, // Fallback for invalid parameters
    };

    Some(ChiSquareOutcome {
        test: TestStatistic::new(chi_square, p_value, df),
        expected,
    })
}
