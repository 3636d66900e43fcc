//! Typed, column-oriented training dataset

use crate::error::{CropPriceError, Result};
use crate::schema::{FeatureRecord, FeatureSchema};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// What to do with training rows that have an empty cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    /// Fail the run, naming the first column with a gap
    #[default]
    Reject,
    /// Remove incomplete rows and continue
    Drop,
}

impl FromStr for MissingValuePolicy {
    type Err = CropPriceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "drop" => Ok(Self::Drop),
            other => Err(CropPriceError::ConfigError(format!(
                "unknown missing value policy {:?} (expected reject or drop)",
                other
            ))),
        }
    }
}

/// Training rows split into categorical, numerical and target columns.
///
/// Columns are stored in schema order. Every column has `n_rows` values.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: FeatureSchema,
    categorical: Vec<Vec<String>>,
    numerical: Vec<Vec<f64>>,
    target: Vec<f64>,
    dropped_rows: usize,
}

impl Dataset {
    /// Build a dataset from a loaded frame.
    ///
    /// The schema is derived from the frame header. Numerical columns must
    /// parse as floats; a non-numeric cell is a `DataError`.
    pub fn from_dataframe(df: &DataFrame, target: &str, policy: MissingValuePolicy) -> Result<Self> {
        let header: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let schema = FeatureSchema::from_columns(header.as_slice(), target)?;

        let raw_categorical = schema
            .categorical()
            .into_iter()
            .map(|name| string_values(df, name).map(|values| (name, values)))
            .collect::<Result<Vec<_>>>()?;
        let raw_numerical = schema
            .numerical()
            .into_iter()
            .map(|name| float_values(df, name).map(|values| (name, values)))
            .collect::<Result<Vec<_>>>()?;
        let raw_target = float_values(df, target)?;

        let n_rows = df.height();
        let mut keep = vec![true; n_rows];

        let gaps = raw_categorical
            .iter()
            .map(|(name, values)| (*name, values.iter().map(Option::is_none).collect::<Vec<_>>()))
            .chain(
                raw_numerical
                    .iter()
                    .map(|(name, values)| (*name, values.iter().map(Option::is_none).collect())),
            )
            .chain(std::iter::once((
                target,
                raw_target.iter().map(Option::is_none).collect(),
            )));

        for (name, missing) in gaps {
            let n_missing = missing.iter().filter(|m| **m).count();
            if n_missing == 0 {
                continue;
            }
            match policy {
                MissingValuePolicy::Reject => {
                    let row = missing.iter().position(|m| *m).unwrap_or(0);
                    return Err(CropPriceError::DataError(format!(
                        "column {} has {} missing value(s), first at row {}",
                        name, n_missing, row
                    )));
                }
                MissingValuePolicy::Drop => {
                    for (k, m) in keep.iter_mut().zip(&missing) {
                        *k &= !*m;
                    }
                }
            }
        }

        let dropped_rows = keep.iter().filter(|k| !**k).count();
        if dropped_rows > 0 {
            warn!(dropped_rows, total_rows = n_rows, "Dropped incomplete training rows");
        }

        let categorical = raw_categorical
            .into_iter()
            .map(|(_, values)| retain(values, &keep))
            .collect();
        let numerical = raw_numerical
            .into_iter()
            .map(|(_, values)| retain(values, &keep))
            .collect();
        let target_values = retain(raw_target, &keep);

        let dataset = Self {
            schema,
            categorical,
            numerical,
            target: target_values,
            dropped_rows,
        };

        info!(
            rows = dataset.n_rows(),
            categorical = ?dataset.schema.categorical(),
            numerical = ?dataset.schema.numerical(),
            "Prepared training dataset"
        );

        Ok(dataset)
    }

    /// Build a dataset from named records and their targets
    pub fn from_records(schema: FeatureSchema, rows: Vec<(FeatureRecord, f64)>) -> Result<Self> {
        let categorical_names = schema.categorical();
        let numerical_names = schema.numerical();

        let mut categorical: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); categorical_names.len()];
        let mut numerical: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); numerical_names.len()];
        let mut target = Vec::with_capacity(rows.len());

        for (record, y) in &rows {
            for (column, name) in categorical.iter_mut().zip(&categorical_names) {
                column.push(record.text(name)?.to_string());
            }
            for (column, name) in numerical.iter_mut().zip(&numerical_names) {
                column.push(record.number(name)?);
            }
            target.push(*y);
        }

        Ok(Self {
            schema,
            categorical,
            numerical,
            target,
            dropped_rows: 0,
        })
    }

    /// Schema derived from the dataset header
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Rows removed by `MissingValuePolicy::Drop`
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Values of a categorical column by name
    pub fn categorical_column(&self, name: &str) -> Option<&[String]> {
        self.schema
            .categorical()
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.categorical[idx].as_slice())
    }

    /// Values of a numerical column by name
    pub fn numerical_column(&self, name: &str) -> Option<&[f64]> {
        self.schema
            .numerical()
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.numerical[idx].as_slice())
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Row `i` as a named record (target excluded)
    pub fn record(&self, i: usize) -> FeatureRecord {
        let mut record = FeatureRecord::new();
        for (name, column) in self.schema.categorical().into_iter().zip(&self.categorical) {
            record = record.with_text(name, column[i].clone());
        }
        for (name, column) in self.schema.numerical().into_iter().zip(&self.numerical) {
            record = record.with_number(name, column[i]);
        }
        record
    }

    /// Subset of rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            categorical: self
                .categorical
                .iter()
                .map(|column| indices.iter().map(|&i| column[i].clone()).collect())
                .collect(),
            numerical: self
                .numerical
                .iter()
                .map(|column| indices.iter().map(|&i| column[i]).collect())
                .collect(),
            target: indices.iter().map(|&i| self.target[i]).collect(),
            dropped_rows: 0,
        }
    }
}

fn retain<T>(values: Vec<Option<T>>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, k)| if *k { v } else { None })
        .collect()
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df
        .column(name)
        .map_err(|_| CropPriceError::FeatureNotFound(name.to_string()))?;
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df
        .column(name)
        .map_err(|_| CropPriceError::FeatureNotFound(name.to_string()))?;
    let series = column
        .as_materialized_series()
        .strict_cast(&DataType::Float64)
        .map_err(|e| CropPriceError::DataError(format!("column {} is not numeric: {}", name, e)))?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}
