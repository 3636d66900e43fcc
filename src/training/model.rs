//! Fitted model artifact

use super::metrics::RegressionMetrics;
use super::random_forest::RandomForest;
use crate::error::Result;
use crate::preprocessing::ColumnTransformer;
use crate::schema::{FeatureRecord, FeatureSchema};
use crate::utils::Dataset;
use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Facts about the run that produced an artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub n_train: usize,
    pub n_test: usize,
    /// Hold-out metrics
    pub metrics: RegressionMetrics,
    pub n_estimators: usize,
    pub random_state: u64,
    /// Model input columns, in order
    pub feature_names: Vec<String>,
}

/// Schema, fitted transformer and forest, persisted together so that
/// inference assembles features exactly as training did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropPriceModel {
    transformer: ColumnTransformer,
    forest: RandomForest,
    metadata: ModelMetadata,
}

impl CropPriceModel {
    pub(crate) fn new(transformer: ColumnTransformer, forest: RandomForest, metadata: ModelMetadata) -> Self {
        Self {
            transformer,
            forest,
            metadata,
        }
    }

    /// Predict the price for one named record
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<f64> {
        let x = self.transformer.transform_record(record)?;
        self.forest.predict_row(x.row(0))
    }

    /// Predict every row of a dataset
    pub fn predict_dataset(&self, data: &Dataset) -> Result<Array1<f64>> {
        let x = self.transformer.transform(data)?;
        self.forest.predict(&x)
    }

    /// Write the artifact as JSON, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        info!(path = %path.display(), n_trees = self.n_trees(), "Saved model artifact");
        Ok(())
    }

    /// Read an artifact written by [`CropPriceModel::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)?;
        info!(path = %path.display(), n_trees = model.n_trees(), "Loaded model artifact");
        Ok(model)
    }

    /// Schema the model was fit with
    pub fn schema(&self) -> &FeatureSchema {
        self.transformer.schema()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn transformer(&self) -> &ColumnTransformer {
        &self.transformer
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }
}
