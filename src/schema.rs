//! Feature schema shared by training and inference
//!
//! The schema is the ordered list of named, typed input fields. Training
//! derives it from the dataset header and stores it in the fitted artifact;
//! inference assembles every request against that stored schema, so the two
//! sides cannot drift apart on names or order.

use crate::error::{CropPriceError, Result};
use serde::{Deserialize, Serialize};

pub const STATE: &str = "STATE";
pub const SOIL_TYPE: &str = "SOIL_TYPE";
pub const CROP: &str = "CROP";
pub const N_SOIL: &str = "N_SOIL";
pub const P_SOIL: &str = "P_SOIL";
pub const K_SOIL: &str = "K_SOIL";
pub const TEMPERATURE: &str = "TEMPERATURE";
pub const HUMIDITY: &str = "HUMIDITY";
pub const PH: &str = "ph";
pub const RAINFALL: &str = "RAINFALL";

/// Target column of the training dataset
pub const TARGET_COLUMN: &str = "CROP_PRICE";

/// Fields encoded as categories; every other non-target column is numerical
pub const CATEGORICAL_COLUMNS: [&str; 3] = [STATE, SOIL_TYPE, CROP];

/// Numerical fields of the documented dataset, in column order
pub const NUMERICAL_COLUMNS: [&str; 7] = [N_SOIL, P_SOIL, K_SOIL, TEMPERATURE, HUMIDITY, PH, RAINFALL];

/// Kind of an input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// String label, one-hot encoded
    Categorical,
    /// Floating point value, passed through
    Numerical,
}

/// One named, typed input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FieldKind::Categorical }
    }

    pub fn numerical(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FieldKind::Numerical }
    }
}

/// Ordered input schema of the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    fields: Vec<FieldSpec>,
    target: String,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::crop_default()
    }
}

impl FeatureSchema {
    /// The documented crop dataset layout:
    /// STATE, SOIL_TYPE, CROP, N_SOIL, P_SOIL, K_SOIL, TEMPERATURE, HUMIDITY, ph, RAINFALL
    pub fn crop_default() -> Self {
        let fields = CATEGORICAL_COLUMNS
            .iter()
            .map(|name| FieldSpec::categorical(*name))
            .chain(NUMERICAL_COLUMNS.iter().map(|name| FieldSpec::numerical(*name)))
            .collect();

        Self { fields, target: TARGET_COLUMN.to_string() }
    }

    /// Derive the schema from a dataset header.
    ///
    /// The three categorical columns must be present, as must the target.
    /// All remaining columns become numerical features in header order, so
    /// a new numeric column in the dataset becomes a feature automatically.
    pub fn from_columns<S: AsRef<str>>(columns: &[S], target: &str) -> Result<Self> {
        let names: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();

        let mut required: Vec<&str> = CATEGORICAL_COLUMNS.to_vec();
        required.push(target);
        for required in required {
            if !names.contains(&required) {
                return Err(CropPriceError::FeatureNotFound(required.to_string()));
            }
        }

        let mut fields: Vec<FieldSpec> = CATEGORICAL_COLUMNS
            .iter()
            .map(|name| FieldSpec::categorical(*name))
            .collect();

        fields.extend(
            names
                .iter()
                .filter(|name| **name != target && !CATEGORICAL_COLUMNS.contains(*name))
                .map(|name| FieldSpec::numerical(*name)),
        );

        Ok(Self { fields, target: target.to_string() })
    }

    /// All fields in order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Target column name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Categorical field names in order
    pub fn categorical(&self) -> Vec<&str> {
        self.names_of(FieldKind::Categorical)
    }

    /// Numerical field names in order
    pub fn numerical(&self) -> Vec<&str> {
        self.names_of(FieldKind::Numerical)
    }

    /// Number of input fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by exact name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn names_of(&self, kind: FieldKind) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// Value of one input field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// A single row of named input values, kept in schema order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    values: Vec<(String, FieldValue)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a categorical value, replacing any previous value of that name
    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, FieldValue::Text(value.into()));
        self
    }

    /// Set a numerical value, replacing any previous value of that name
    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.insert(name, FieldValue::Number(value));
        self
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        match self.values.iter().position(|(n, _)| n == name) {
            Some(idx) => self.values[idx].1 = value,
            None => self.values.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Categorical value of `name`
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Ok(s),
            Some(FieldValue::Number(_)) => Err(CropPriceError::ValidationError(format!(
                "field {} must be categorical",
                name
            ))),
            None => Err(CropPriceError::FeatureNotFound(name.to_string())),
        }
    }

    /// Numerical value of `name`
    pub fn number(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(FieldValue::Number(v)) => Ok(*v),
            Some(FieldValue::Text(_)) => Err(CropPriceError::ValidationError(format!(
                "field {} must be numerical",
                name
            ))),
            None => Err(CropPriceError::FeatureNotFound(name.to_string())),
        }
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
