//! One-hot categorical encoding

use crate::error::{CropPriceError, Result};
use ndarray::{Array2, ArrayViewMut1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder over a fixed set of named string columns.
///
/// Categories per column are the sorted distinct training values. A value
/// not seen during fit encodes as an all-zero block instead of an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Encoded column names, in output order
    columns: Vec<String>,
    /// Sorted categories per column
    categories: Vec<Vec<String>>,
    is_fitted: bool,
}

impl OneHotEncoder {
    /// Create a new, unfitted encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the encoder on named columns of string values
    pub fn fit<S: AsRef<str>>(&mut self, columns: &[(&str, &[S])]) -> Result<&mut Self> {
        let mut names = Vec::with_capacity(columns.len());
        let mut categories = Vec::with_capacity(columns.len());

        for (name, values) in columns {
            let distinct: BTreeSet<&str> = values.iter().map(|v| v.as_ref()).collect();
            if distinct.is_empty() {
                return Err(CropPriceError::ValidationError(format!(
                    "column {} has no values to encode",
                    name
                )));
            }
            names.push(name.to_string());
            categories.push(distinct.into_iter().map(str::to_string).collect());
        }

        self.columns = names;
        self.categories = categories;
        self.is_fitted = true;
        Ok(self)
    }

    /// Whether `fit` has been called
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Encoded column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learned categories of a column
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.categories[idx].as_slice())
    }

    /// Total width of the indicator block
    pub fn n_output_features(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Output feature names, `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.categories)
            .flat_map(|(col, cats)| cats.iter().map(move |cat| format!("{}_{}", col, cat)))
            .collect()
    }

    /// Encode one row of values (one per fitted column, in fitted order)
    /// into `out`, which must be `n_output_features` wide.
    pub fn encode_row<S: AsRef<str>>(&self, values: &[S], mut out: ArrayViewMut1<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(CropPriceError::ModelNotFitted);
        }
        if values.len() != self.columns.len() {
            return Err(CropPriceError::ShapeError {
                expected: format!("{} categorical values", self.columns.len()),
                actual: format!("{} values", values.len()),
            });
        }
        if out.len() != self.n_output_features() {
            return Err(CropPriceError::ShapeError {
                expected: format!("{} output columns", self.n_output_features()),
                actual: format!("{} output columns", out.len()),
            });
        }

        out.fill(0.0);
        let mut offset = 0;
        for (value, cats) in values.iter().zip(&self.categories) {
            if let Ok(pos) = cats.binary_search_by(|c| c.as_str().cmp(value.as_ref())) {
                out[offset + pos] = 1.0;
            }
            offset += cats.len();
        }
        Ok(())
    }

    /// Encode whole columns (in fitted order) into an indicator matrix
    pub fn transform<S: AsRef<str>>(&self, columns: &[&[S]]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(CropPriceError::ModelNotFitted);
        }
        let n_rows = columns.first().map_or(0, |c| c.len());
        if columns.iter().any(|c| c.len() != n_rows) {
            return Err(CropPriceError::ShapeError {
                expected: format!("all columns with {} rows", n_rows),
                actual: "columns of differing length".to_string(),
            });
        }

        let mut out = Array2::zeros((n_rows, self.n_output_features()));
        let mut row: Vec<&str> = Vec::with_capacity(columns.len());
        for (i, out_row) in out.outer_iter_mut().enumerate() {
            row.clear();
            row.extend(columns.iter().map(|c| c[i].as_ref()));
            self.encode_row(row.as_slice(), out_row)?;
        }
        Ok(out)
    }
}
