//! In-memory tabular dataset with an explicit per-column type tag.
//!
//! Columns are tagged [`ColumnKind::Numerical`] or [`ColumnKind::Categorical`]
//! when they are built, so nothing downstream has to guess a column's type from
//! its values. Integer-coded categoricals go through
//! [`Column::categorical_from_codes`] and are never treated as numbers.

use std::collections::{BTreeSet, HashSet};

use crate::error::{EdaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numerical,
    Categorical,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numerical(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

/// Distinct non-missing values of a column together with each row's level index.
#[derive(Debug, Clone, PartialEq)]
pub struct Levels {
    /// Sorted level names. Numerical levels are sorted numerically.
    pub names: Vec<String>,
    /// Index into `names` for every row, `None` where the value is missing.
    pub codes: Vec<Option<usize>>,
}

impl Levels {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl Column {
    /// Create a numerical column. NaN values are stored as missing and `-0.0`
    /// is stored as `0.0`.
    pub fn numerical(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| {
                v.filter(|x| !x.is_nan())
                    .map(|x| if x == 0.0 { 0.0 } else { x })
            })
            .collect();
        Column {
            name: name.into(),
            data: ColumnData::Numerical(values),
        }
    }

    /// Create a numerical column without missing values.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::numerical(name, values.iter().map(|&v| Some(v)).collect())
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// Create a categorical column without missing values.
    pub fn from_labels<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::categorical(
            name,
            values.iter().map(|v| Some(v.as_ref().to_string())).collect(),
        )
    }

    /// Create a categorical column from integer codes, e.g. a 0/1 target.
    pub fn categorical_from_codes(name: impl Into<String>, codes: Vec<Option<i64>>) -> Self {
        Self::categorical(
            name,
            codes.into_iter().map(|c| c.map(|c| c.to_string())).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numerical(_) => ColumnKind::Numerical,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numerical(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numerical(v) => v[row].is_none(),
            ColumnData::Categorical(v) => v[row].is_none(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    /// Numerical values, or `None` for a categorical column.
    pub fn as_numerical(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numerical(v) => Some(v),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Compute the sorted distinct levels of this column and each row's level index.
    pub fn levels(&self) -> Levels {
        match &self.data {
            ColumnData::Numerical(values) => {
                let mut distinct: Vec<f64> = values.iter().flatten().copied().collect();
                distinct.sort_by(|a, b| a.total_cmp(b));
                distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());

                let codes = values
                    .iter()
                    .map(|v| {
                        v.and_then(|x| distinct.binary_search_by(|d| d.total_cmp(&x)).ok())
                    })
                    .collect();

                Levels {
                    names: distinct.iter().map(|v| v.to_string()).collect(),
                    codes,
                }
            }
            ColumnData::Categorical(values) => {
                let names: Vec<String> = values
                    .iter()
                    .flatten()
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();

                let codes = values
                    .iter()
                    .map(|v| {
                        v.as_ref()
                            .and_then(|s| names.binary_search_by(|n| n.as_str().cmp(s)).ok())
                    })
                    .collect();

                Levels { names, codes }
            }
        }
    }
}

/// A read-only table of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let first = columns.first().ok_or(EdaError::EmptyDataset)?;
        let n_rows = first.len();

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(EdaError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != n_rows {
                return Err(EdaError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: n_rows,
                    got: column.len(),
                });
            }
        }

        Ok(Dataset { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| EdaError::MissingColumn(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Names of the numerical columns in schema order.
    pub fn numerical_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Numerical)
    }

    /// Names of the categorical columns in schema order.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of_kind(ColumnKind::Categorical)
    }

    fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.name())
            .collect()
    }

    /// Copy of the dataset without the named columns. Unknown names are ignored.
    pub fn without_columns<S: AsRef<str>>(&self, names: &[S]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .filter(|c| !names.iter().any(|n| n.as_ref() == c.name()))
            .cloned()
            .collect();
        Dataset {
            columns,
            n_rows: self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::from_f64("age", &[31.0, 45.0, 27.0, 45.0]),
            Column::from_labels("plan", &["basic", "pro", "basic", "free"]),
            Column::categorical_from_codes("churn", vec![Some(0), Some(1), None, Some(1)]),
        ])
        .unwrap()
    }

    #[test]
    fn schema_is_split_by_type_tag() {
        let ds = sample();
        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.n_columns(), 3);
        assert_eq!(ds.numerical_columns(), vec!["age"]);
        assert_eq!(ds.categorical_columns(), vec!["plan", "churn"]);
    }

    #[test]
    fn integer_codes_stay_categorical() {
        let ds = sample();
        let churn = ds.column("churn").unwrap();
        assert_eq!(churn.kind(), ColumnKind::Categorical);
        assert!(churn.as_numerical().is_none());
        assert_eq!(churn.missing_count(), 1);
    }

    #[test]
    fn nan_is_missing() {
        let col = Column::numerical("x", vec![Some(1.0), Some(f64::NAN), None]);
        assert_eq!(col.missing_count(), 2);
    }

    #[test]
    fn signed_zero_is_one_level() {
        let col = Column::from_f64("churn", &[0.0, -0.0, 0.0, 1.0, 1.0, 1.0]);
        let levels = col.levels();
        assert_eq!(levels.names, vec!["0", "1"]);
        assert_eq!(
            levels.codes,
            vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
        assert!(col.as_numerical().unwrap()[1].unwrap().is_sign_positive());
    }

    #[test]
    fn levels_are_sorted_and_coded() {
        let ds = sample();
        let plan = ds.column("plan").unwrap().levels();
        assert_eq!(plan.names, vec!["basic", "free", "pro"]);
        assert_eq!(plan.codes, vec![Some(0), Some(2), Some(0), Some(1)]);

        let churn = ds.column("churn").unwrap().levels();
        assert_eq!(churn.names, vec!["0", "1"]);
        assert_eq!(churn.codes, vec![Some(0), Some(1), None, Some(1)]);
    }

    #[test]
    fn numerical_levels_sort_numerically() {
        let col = Column::from_f64("grade", &[10.0, 2.0, 10.0, 1.5]);
        let levels = col.levels();
        assert_eq!(levels.names, vec!["1.5", "2", "10"]);
        assert_eq!(levels.codes, vec![Some(2), Some(1), Some(2), Some(0)]);
    }

    #[test]
    fn construction_is_validated() {
        assert!(matches!(Dataset::new(vec![]), Err(EdaError::EmptyDataset)));

        let err = Dataset::new(vec![
            Column::from_f64("a", &[1.0, 2.0]),
            Column::from_f64("b", &[1.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, EdaError::LengthMismatch { expected: 2, got: 1, .. }));

        let err = Dataset::new(vec![
            Column::from_f64("a", &[1.0]),
            Column::from_labels("a", &["x"]),
        ])
        .unwrap_err();
        assert!(matches!(err, EdaError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn dropping_columns_ignores_unknown_names() {
        let ds = sample().without_columns(&["plan", "customer_id"]);
        assert_eq!(ds.n_columns(), 2);
        assert!(!ds.has_column("plan"));
        assert!(matches!(ds.column("plan"), Err(EdaError::MissingColumn(_))));
    }
}
