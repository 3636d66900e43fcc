//! Model training module
//!
//! Offline pipeline that turns a labeled CSV into a persisted
//! [`CropPriceModel`]:
//! - Hold-out split with a seeded shuffle
//! - CART regression trees bagged into a random forest
//! - Regression metrics on the held-out rows
//! - JSON artifact with schema, encoder, forest and metadata

mod config;
mod engine;
mod metrics;
mod model;
pub mod decision_tree;
pub mod random_forest;
pub mod split;

pub use config::{TrainingConfig, DEFAULT_DATA_PATH, DEFAULT_MODEL_PATH};
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{sample_record, TrainEngine, TrainingReport};
pub use metrics::RegressionMetrics;
pub use model::{CropPriceModel, ModelMetadata};
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{train_test_split, TrainTestSplit};
