//! Crop Price - random forest price estimates for crops
//!
//! This crate provides:
//! - An offline training pipeline: CSV loading, one-hot encoding, hold-out
//!   evaluation, random forest regression and a JSON model artifact
//! - Single-record inference with soil-type defaults for missing inputs
//! - A small web form server and a CLI
//!
//! # Modules
//!
//! ## Core
//! - [`schema`] - Ordered feature schema shared by training and inference
//! - [`preprocessing`] - One-hot encoder and column transformer
//! - [`training`] - Trees, forest, metrics and the training engine
//! - [`inference`] - Request parsing, numeric policies, prediction
//!
//! ## Services
//! - [`server`] - HTTP server with the prediction form
//! - [`cli`] - Command-line interface
//!
//! ## Utilities
//! - [`utils`] - CSV loading and the typed dataset

// Core error handling
pub mod error;

// Core ML modules
pub mod schema;
pub mod preprocessing;
pub mod training;
pub mod inference;

// Utilities
pub mod utils;

// Services
pub mod server;
pub mod cli;

pub use error::{CropPriceError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{CropPriceError, Result};

    // Schema
    pub use crate::schema::{FeatureRecord, FeatureSchema, FieldKind, FieldValue};

    // Preprocessing
    pub use crate::preprocessing::{ColumnTransformer, OneHotEncoder};

    // Training
    pub use crate::training::{CropPriceModel, RandomForest, RegressionMetrics, TrainEngine, TrainingConfig};

    // Inference
    pub use crate::inference::{Estimate, InferenceEngine, InferencePolicy, PredictionRequest, SoilDefaults};

    // Data
    pub use crate::utils::{DataLoader, Dataset, MissingValuePolicy};
}
