//! Column transformer: one-hot categoricals followed by passthrough numericals

use crate::error::{CropPriceError, Result};
use crate::schema::{FeatureRecord, FeatureSchema};
use crate::utils::Dataset;
use super::OneHotEncoder;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

/// Builds the model input matrix from named fields.
///
/// Output layout is fixed at fit time:
/// `[one-hot(categorical_1) | ... | one-hot(categorical_k) | numerical_1 .. numerical_m]`,
/// categoricals and numericals each in schema order. Inputs are always
/// matched by field name, never by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnTransformer {
    schema: FeatureSchema,
    encoder: OneHotEncoder,
    is_fitted: bool,
}

impl Default for ColumnTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnTransformer {
    /// Create an unfitted transformer
    pub fn new() -> Self {
        Self {
            schema: FeatureSchema::crop_default(),
            encoder: OneHotEncoder::new(),
            is_fitted: false,
        }
    }

    /// Learn the schema and category vocabulary from a dataset
    pub fn fit(&mut self, data: &Dataset) -> Result<&mut Self> {
        let schema = data.schema().clone();

        let columns = schema
            .categorical()
            .into_iter()
            .map(|name| {
                data.categorical_column(name)
                    .map(|values| (name, values))
                    .ok_or_else(|| CropPriceError::FeatureNotFound(name.to_string()))
            })
            .collect::<Result<Vec<(&str, &[String])>>>()?;

        let mut encoder = OneHotEncoder::new();
        encoder.fit(columns.as_slice())?;

        self.encoder = encoder;
        self.schema = schema;
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform every row of a dataset
    pub fn transform(&self, data: &Dataset) -> Result<Array2<f64>> {
        self.check_fitted()?;

        let categorical = self
            .schema
            .categorical()
            .into_iter()
            .map(|name| {
                data.categorical_column(name)
                    .ok_or_else(|| CropPriceError::FeatureNotFound(name.to_string()))
            })
            .collect::<Result<Vec<&[String]>>>()?;

        let numerical = self
            .schema
            .numerical()
            .into_iter()
            .map(|name| {
                data.numerical_column(name)
                    .ok_or_else(|| CropPriceError::FeatureNotFound(name.to_string()))
            })
            .collect::<Result<Vec<&[f64]>>>()?;

        let n_rows = data.n_rows();
        let n_encoded = self.encoder.n_output_features();
        let mut x = Array2::zeros((n_rows, self.n_features_out()));

        x.slice_mut(s![.., ..n_encoded])
            .assign(&self.encoder.transform(categorical.as_slice())?);

        for (j, column) in numerical.iter().enumerate() {
            for (i, value) in column.iter().enumerate() {
                x[[i, n_encoded + j]] = *value;
            }
        }

        Ok(x)
    }

    /// Transform a single named record into a one-row matrix
    pub fn transform_record(&self, record: &FeatureRecord) -> Result<Array2<f64>> {
        self.check_fitted()?;

        let categorical = self
            .schema
            .categorical()
            .into_iter()
            .map(|name| record.text(name))
            .collect::<Result<Vec<&str>>>()?;

        let n_encoded = self.encoder.n_output_features();
        let mut x = Array2::zeros((1, self.n_features_out()));
        self.encoder
            .encode_row(categorical.as_slice(), x.slice_mut(s![0, ..n_encoded]))?;

        for (j, name) in self.schema.numerical().into_iter().enumerate() {
            x[[0, n_encoded + j]] = record.number(name)?;
        }

        Ok(x)
    }

    /// Schema the transformer was fit with
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// Width of the output matrix
    pub fn n_features_out(&self) -> usize {
        self.encoder.n_output_features() + self.schema.numerical().len()
    }

    /// Output column names in order
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = self.encoder.feature_names();
        names.extend(self.schema.numerical().into_iter().map(str::to_string));
        names
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn check_fitted(&self) -> Result<()> {
        if self.is_fitted {
            Ok(())
        } else {
            Err(CropPriceError::ModelNotFitted)
        }
    }
}
