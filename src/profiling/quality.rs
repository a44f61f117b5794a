use std::collections::HashSet;

use crate::dataset::{ColumnData, Dataset};

/// Fraction of missing values per column, for columns that have any.
pub fn missing_value_fractions(dataset: &Dataset) -> Vec<(String, f64)> {
    let n_rows = dataset.n_rows();
    if n_rows == 0 {
        return Vec::new();
    }

    dataset
        .columns()
        .iter()
        .filter_map(|column| {
            let missing = column.missing_count();
            (missing > 0).then(|| (column.name().to_string(), missing as f64 / n_rows as f64))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Label(&'a str),
}

/// Number of rows identical to an earlier row; the first occurrence is not counted.
pub fn duplicate_row_count(dataset: &Dataset) -> usize {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(dataset.n_rows());
    let mut duplicates = 0;

    for row in 0..dataset.n_rows() {
        let key: Vec<CellKey<'_>> = dataset
            .columns()
            .iter()
            .map(|column| match column.data() {
                ColumnData::Numerical(values) => match values[row] {
                    // +0.0 and -0.0 compare equal
                    Some(v) if v == 0.0 => CellKey::Number(0),
                    Some(v) => CellKey::Number(v.to_bits()),
                    None => CellKey::Missing,
                },
                ColumnData::Categorical(values) => match &values[row] {
                    Some(label) => CellKey::Label(label),
                    None => CellKey::Missing,
                },
            })
            .collect();

        if !seen.insert(key) {
            duplicates += 1;
        }
    }

    duplicates
}
