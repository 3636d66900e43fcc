//! Error types for the server

use crate::error::CropPriceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Anything that went wrong turning a form into a prediction
    #[error(transparent)]
    Prediction(#[from] CropPriceError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            // Prediction failures keep a 200 so the form page shows the text
            ServerError::Prediction(e) => {
                tracing::warn!(error = %e, "Prediction failed");
                (StatusCode::OK, format!("Error: {}", e)).into_response()
            }
            ServerError::NotFound(path) => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", path)).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_is_plain_text_ok() {
        let response = ServerError::from(CropPriceError::MissingField("STATE".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        let response = ServerError::NotFound("/nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
