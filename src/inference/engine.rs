//! Inference engine implementation

use super::defaults::SoilDefaults;
use super::request::PredictionRequest;
use super::resolver::NumericResolver;
use super::InferencePolicy;
use crate::error::{CropPriceError, Result};
use crate::schema::{FeatureRecord, FieldKind};
use crate::training::CropPriceModel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A price estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
}

impl Estimate {
    /// Value rounded to two decimals for display, exact halves to even
    pub fn rounded(&self) -> f64 {
        (self.value * 100.0).round_ties_even() / 100.0
    }
}

/// Predicts prices for single requests against a loaded model
pub struct InferenceEngine {
    model: Arc<CropPriceModel>,
    defaults: Arc<SoilDefaults>,
    resolver: Box<dyn NumericResolver>,
    policy: InferencePolicy,
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("policy", &self.policy)
            .field("n_trees", &self.model.n_trees())
            .field("soils", &self.defaults.len())
            .finish()
    }
}

impl InferenceEngine {
    /// Create an engine over an already loaded model
    pub fn new(model: Arc<CropPriceModel>, defaults: Arc<SoilDefaults>, policy: InferencePolicy) -> Self {
        Self {
            model,
            defaults,
            resolver: policy.resolver(),
            policy,
        }
    }

    /// Load the artifact at `path` and use the standard soil table
    pub fn from_path(path: impl AsRef<Path>, policy: InferencePolicy) -> Result<Self> {
        let model = CropPriceModel::load(path)?;
        Ok(Self::new(
            Arc::new(model),
            Arc::new(SoilDefaults::standard()),
            policy,
        ))
    }

    /// Build the model input record in the schema order the model was fit
    /// with.
    pub fn assemble(&self, request: &PredictionRequest) -> Result<FeatureRecord> {
        let mut record = FeatureRecord::new();

        for field in self.model.schema().fields() {
            match field.kind {
                FieldKind::Categorical => {
                    let value = request
                        .text(&field.name)
                        .ok_or_else(|| CropPriceError::MissingField(field.name.clone()))?;
                    record = record.with_text(&field.name, value);
                }
                FieldKind::Numerical => {
                    let value = self.resolver.resolve(
                        &field.name,
                        request.raw(&field.name),
                        &request.soil_type,
                        &self.defaults,
                    )?;
                    record = record.with_number(&field.name, value);
                }
            }
        }

        Ok(record)
    }

    /// Predict the price for one request
    pub fn predict(&self, request: &PredictionRequest) -> Result<Estimate> {
        let start = Instant::now();
        let record = self.assemble(request)?;
        let value = self.model.predict_record(&record)?;

        debug!(
            state = %request.state,
            soil_type = %request.soil_type,
            crop = %request.crop,
            value,
            latency_us = start.elapsed().as_micros() as u64,
            "Prediction"
        );

        Ok(Estimate { value })
    }

    pub fn policy(&self) -> InferencePolicy {
        self.policy
    }

    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }

    pub fn model(&self) -> &Arc<CropPriceModel> {
        &self.model
    }

    pub fn defaults(&self) -> &SoilDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounding() {
        assert_eq!(Estimate { value: 1234.5678 }.rounded(), 1234.57);
        assert_eq!(Estimate { value: 10.0 }.rounded(), 10.0);
        assert_eq!(Estimate { value: 0.004 }.rounded(), 0.0);
    }

    #[test]
    fn test_estimate_rounds_halves_to_even() {
        assert_eq!(Estimate { value: 0.125 }.rounded(), 0.12);
        assert_eq!(Estimate { value: 0.375 }.rounded(), 0.38);
        assert_eq!(Estimate { value: 1.125 }.rounded(), 1.12);
        assert_eq!(Estimate { value: -0.125 }.rounded(), -0.12);
    }
}
