//! One-hot design matrices built from dataset columns.
//!
//! Numeric and boolean features pass through as single columns. Text and
//! categorical features expand into one 0/1 column per observed category,
//! named `{feature}_{category}` with categories in lexicographic order.
//! Pass-through columns come first (in feature order), followed by the
//! indicator groups (also in feature order).

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use polars::prelude::DataFrame;
use scorecard_model::{Result, ScorecardError};

use crate::frame::{self, ColumnKind};

/// Dense numeric matrix with one named column per design feature.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl DesignMatrix {
    /// Encode `features` of `data` into a design matrix.
    pub fn from_frame<S: AsRef<str>>(data: &DataFrame, features: &[S]) -> Result<Self> {
        let mut passthrough = Vec::new();
        let mut indicators = Vec::new();
        for feature in features {
            let name = feature.as_ref();
            let column = frame::column(data, name)?;
            match frame::column_kind(column)? {
                ColumnKind::Numeric => {
                    passthrough.push((name.to_string(), frame::numeric_values(column)?));
                }
                ColumnKind::Boolean => {
                    passthrough.push((name.to_string(), frame::boolean_values(column)?));
                }
                ColumnKind::Categorical => {
                    indicators.extend(one_hot(name, &frame::category_values(column)?));
                }
            }
        }
        passthrough.extend(indicators);
        Self::from_columns_with_height(data.height(), passthrough)
    }

    /// Assemble a matrix from already-numeric named columns.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        Self::from_columns_with_height(height, columns)
    }

    fn from_columns_with_height(height: usize, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        for (_, values) in &columns {
            if values.len() != height {
                return Err(ScorecardError::LengthMismatch {
                    what: "design column",
                    expected: height,
                    actual: values.len(),
                });
            }
        }
        let (names, vectors): (Vec<String>, Vec<Vec<f64>>) = columns.into_iter().unzip();
        let data: Vec<f64> = vectors.into_iter().flatten().collect();
        Ok(Self {
            values: DMatrix::from_vec(height, names.len(), data),
            columns: names,
        })
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Values of column `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn column(&self, index: usize) -> &[f64] {
        let rows = self.nrows();
        &self.values.as_slice()[index * rows..(index + 1) * rows]
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), self.column(index)))
    }

    /// Copy of this matrix with a trailing 0/1 column for `indicator`.
    pub fn with_indicator(&self, name: &str, indicator: &[bool]) -> Result<Self> {
        if indicator.len() != self.nrows() {
            return Err(ScorecardError::LengthMismatch {
                what: "indicator",
                expected: self.nrows(),
                actual: indicator.len(),
            });
        }
        let index = self.ncols();
        let mut values = self.values.clone().insert_column(index, 0.0);
        for (row, flag) in indicator.iter().enumerate() {
            if *flag {
                values[(row, index)] = 1.0;
            }
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        Ok(Self { columns, values })
    }
}

fn one_hot(name: &str, values: &[Option<String>]) -> Vec<(String, Vec<f64>)> {
    let categories: BTreeSet<&str> = values.iter().flatten().map(String::as_str).collect();
    categories
        .into_iter()
        .map(|category| {
            let indicator = values
                .iter()
                .map(|value| {
                    if value.as_deref() == Some(category) {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect();
            (format!("{name}_{category}"), indicator)
        })
        .collect()
}
