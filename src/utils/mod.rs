//! Data loading and dataset utilities

pub mod data_loader;
pub mod dataset;

pub use data_loader::DataLoader;
pub use dataset::{Dataset, MissingValuePolicy};
