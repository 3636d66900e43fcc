//! Error types for the crop price predictor

use thiserror::Error;

/// Result type alias for crop price operations
pub type Result<T> = std::result::Result<T, CropPriceError>;

/// Main error type for training and inference
#[derive(Error, Debug)]
pub enum CropPriceError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Quality gate failed: test MSE {mse:.4} exceeds limit {limit:.4}")]
    QualityGate { mse: f64, limit: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<polars::error::PolarsError> for CropPriceError {
    fn from(err: polars::error::PolarsError) -> Self {
        CropPriceError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for CropPriceError {
    fn from(err: serde_json::Error) -> Self {
        CropPriceError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CropPriceError {
    fn from(err: ndarray::ShapeError) -> Self {
        CropPriceError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropPriceError::MissingField("N_SOIL".to_string());
        assert_eq!(err.to_string(), "Missing required field: N_SOIL");
    }

    #[test]
    fn test_invalid_number_display() {
        let err = CropPriceError::InvalidNumber {
            field: "ph".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid number for ph: \"abc\"");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CropPriceError = io_err.into();
        assert!(matches!(err, CropPriceError::IoError(_)));
    }
}
