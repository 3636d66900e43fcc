//! Inference engine module
//!
//! Single-record prediction against a loaded [`CropPriceModel`](crate::training::CropPriceModel):
//! - Form fields parsed into a [`PredictionRequest`]
//! - Numerical fields resolved by a [`NumericResolver`] chosen through
//!   [`InferencePolicy`] (soil-default fill or strict)
//! - Features assembled in the schema order stored in the artifact

mod config;
mod defaults;
mod engine;
mod request;
mod resolver;

pub use config::InferencePolicy;
pub use defaults::{SoilDefaults, SoilProfile};
pub use engine::{Estimate, InferenceEngine};
pub use request::PredictionRequest;
pub use resolver::{DefaultFill, NumericResolver, Strict};
