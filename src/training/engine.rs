//! Training engine implementation

use super::metrics::RegressionMetrics;
use super::model::{CropPriceModel, ModelMetadata};
use super::random_forest::RandomForest;
use super::split::train_test_split;
use super::TrainingConfig;
use crate::error::{CropPriceError, Result};
use crate::preprocessing::ColumnTransformer;
use crate::schema::{self, FeatureRecord};
use crate::utils::{DataLoader, Dataset};
use chrono::Utc;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a full training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Hold-out metrics
    pub metrics: RegressionMetrics,
    /// Prediction for [`sample_record`] from the reloaded artifact
    pub sample_prediction: f64,
    pub model_path: PathBuf,
    pub n_train: usize,
    pub n_test: usize,
    /// Rows removed by the missing value policy
    pub dropped_rows: usize,
    pub training_time_secs: f64,
}

/// The record predicted after every run as a smoke check of the artifact
pub fn sample_record() -> FeatureRecord {
    FeatureRecord::new()
        .with_text(schema::STATE, "Karnataka")
        .with_text(schema::SOIL_TYPE, "Loamy soil")
        .with_text(schema::CROP, "Rice")
        .with_number(schema::N_SOIL, 80.0)
        .with_number(schema::P_SOIL, 40.0)
        .with_number(schema::K_SOIL, 45.0)
        .with_number(schema::TEMPERATURE, 25.0)
        .with_number(schema::HUMIDITY, 75.0)
        .with_number(schema::PH, 6.5)
        .with_number(schema::RAINFALL, 300.0)
}

/// Fits, evaluates and persists the crop price model
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    /// Create a new training engine
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Split the dataset, fit the transformer and forest on the training
    /// rows and score the held-out rows.
    ///
    /// The encoder vocabulary comes from the training rows only; categories
    /// that appear only in the test rows encode as zeros.
    pub fn fit(&self, data: &Dataset) -> Result<CropPriceModel> {
        self.config.validate()?;

        let split = train_test_split(data.n_rows(), self.config.test_size, self.config.random_state)?;
        let train = data.select(&split.train_indices);
        let test = data.select(&split.test_indices);

        debug!(
            n_train = train.n_rows(),
            n_test = test.n_rows(),
            seed = self.config.random_state,
            "Split dataset"
        );

        let mut transformer = ColumnTransformer::new();
        transformer.fit(&train)?;

        let x_train = transformer.transform(&train)?;
        let y_train = Array1::from(train.target().to_vec());

        let mut forest = RandomForest::new(self.config.n_estimators)
            .with_random_state(self.config.random_state)
            .with_min_samples_split(self.config.min_samples_split)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_max_features(self.config.max_features);
        if let Some(depth) = self.config.max_depth {
            forest = forest.with_max_depth(depth);
        }
        forest.fit(&x_train, &y_train)?;

        let x_test = transformer.transform(&test)?;
        let y_test = Array1::from(test.target().to_vec());
        let y_pred = forest.predict(&x_test)?;
        let metrics = RegressionMetrics::compute(&y_test, &y_pred)?;

        let metadata = ModelMetadata {
            trained_at: Utc::now(),
            n_train: train.n_rows(),
            n_test: test.n_rows(),
            metrics,
            n_estimators: self.config.n_estimators,
            random_state: self.config.random_state,
            feature_names: transformer.feature_names(),
        };

        Ok(CropPriceModel::new(transformer, forest, metadata))
    }

    /// Load the configured dataset, fit, persist and verify the artifact.
    ///
    /// When `max_test_mse` is set and exceeded, nothing is written.
    pub fn run(&self) -> Result<TrainingReport> {
        let start = Instant::now();
        self.config.validate()?;

        let df = DataLoader::new().load_csv(&self.config.data_path)?;
        let data = Dataset::from_dataframe(&df, &self.config.target_column, self.config.missing_values)?;

        let model = self.fit(&data)?;
        let metadata = model.metadata().clone();

        info!(
            mse = metadata.metrics.mse,
            rmse = metadata.metrics.rmse,
            mae = metadata.metrics.mae,
            n_test = metadata.n_test,
            "Hold-out evaluation"
        );

        if let Some(limit) = self.config.max_test_mse {
            if metadata.metrics.mse > limit {
                return Err(CropPriceError::QualityGate {
                    mse: metadata.metrics.mse,
                    limit,
                });
            }
        }

        model.save(&self.config.model_path)?;

        let reloaded = CropPriceModel::load(&self.config.model_path)?;
        let sample_prediction = reloaded.predict_record(&sample_record())?;

        let training_time_secs = start.elapsed().as_secs_f64();
        info!(
            sample_prediction,
            elapsed_secs = training_time_secs,
            "Training run complete"
        );

        Ok(TrainingReport {
            metrics: metadata.metrics,
            sample_prediction,
            model_path: self.config.model_path.clone(),
            n_train: metadata.n_train,
            n_test: metadata.n_test,
            dropped_rows: data.dropped_rows(),
            training_time_secs,
        })
    }
}
