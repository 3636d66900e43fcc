//! Training configuration

use super::random_forest::MaxFeatures;
use crate::error::{CropPriceError, Result};
use crate::schema::TARGET_COLUMN;
use crate::utils::MissingValuePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default training dataset path
pub const DEFAULT_DATA_PATH: &str = "crop_data.csv";

/// Default artifact path
pub const DEFAULT_MODEL_PATH: &str = "crop_price_model.json";

/// Configuration for a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Labeled CSV dataset
    pub data_path: PathBuf,

    /// Where the fitted artifact is written
    pub model_path: PathBuf,

    /// Target column name
    pub target_column: String,

    /// Number of trees
    pub n_estimators: usize,

    /// Seed for the split and the forest
    pub random_state: u64,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    // Tree-specific parameters
    /// Maximum depth of trees
    pub max_depth: Option<usize>,

    /// Minimum samples to split a node
    pub min_samples_split: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Features considered at each split
    pub max_features: MaxFeatures,

    /// Handling of empty cells in the dataset
    pub missing_values: MissingValuePolicy,

    /// Fail the run instead of persisting when hold-out MSE exceeds this
    pub max_test_mse: Option<f64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            target_column: TARGET_COLUMN.to_string(),
            n_estimators: 100,
            random_state: 42,
            test_size: 0.2,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            missing_values: MissingValuePolicy::Reject,
            max_test_mse: None,
        }
    }
}

impl TrainingConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the dataset path
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Builder method to set the artifact path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// Builder method to set the target column
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    /// Builder method to set number of estimators
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Builder method to set the hold-out fraction
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Builder method to set max depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Builder method to set max features
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Builder method to set the missing value policy
    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Builder method to enable the quality gate
    pub fn with_max_test_mse(mut self, limit: f64) -> Self {
        self.max_test_mse = Some(limit);
        self
    }

    /// Check the values that would otherwise fail deep inside training
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(CropPriceError::ConfigError(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(CropPriceError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if let Some(limit) = self.max_test_mse {
            if !limit.is_finite() || limit < 0.0 {
                return Err(CropPriceError::ConfigError(format!(
                    "max_test_mse must be a non-negative number, got {}",
                    limit
                )));
            }
        }
        if self.target_column.is_empty() {
            return Err(CropPriceError::ConfigError("target column is empty".to_string()));
        }
        Ok(())
    }
}
