//! Prediction request parsed from a form body

use crate::error::{CropPriceError, Result};
use crate::schema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One prediction request.
///
/// Categorical fields are required and non-empty. Every other field is kept
/// as its raw string and resolved later against the model schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub state: String,
    pub soil_type: String,
    pub crop: String,
    values: HashMap<String, String>,
}

impl PredictionRequest {
    pub fn new(state: impl Into<String>, soil_type: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            soil_type: soil_type.into(),
            crop: crop.into(),
            values: HashMap::new(),
        }
    }

    /// Attach a raw value for a numerical field
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Build from form fields keyed by schema name
    pub fn from_form(mut form: HashMap<String, String>) -> Result<Self> {
        let mut take = |field: &str| -> Result<String> {
            match form.remove(field) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(CropPriceError::MissingField(field.to_string())),
            }
        };

        let state = take(schema::STATE)?;
        let soil_type = take(schema::SOIL_TYPE)?;
        let crop = take(schema::CROP)?;

        Ok(Self {
            state,
            soil_type,
            crop,
            values: form,
        })
    }

    /// Categorical value by schema name
    pub fn text(&self, field: &str) -> Option<&str> {
        match field {
            schema::STATE => Some(&self.state),
            schema::SOIL_TYPE => Some(&self.soil_type),
            schema::CROP => Some(&self.crop),
            _ => None,
        }
    }

    /// Raw value of a numerical field, `None` when absent or blank
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.values
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}
