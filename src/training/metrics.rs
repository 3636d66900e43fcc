//! Regression metrics

use crate::error::{CropPriceError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Goodness of fit on a set of predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// R-squared, undefined when the true values are constant
    pub r2: Option<f64>,
    /// Number of evaluated samples
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute regression metrics
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(CropPriceError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(CropPriceError::InsufficientData { required: 1, actual: 0 });
        }

        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let ss_res: f64 = errors.iter().map(|e| e * e).sum();
        let mse = ss_res / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let r2 = if ss_tot > 0.0 {
            Some(1.0 - ss_res / ss_tot)
        } else {
            None
        };

        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
            n_samples: y_true.len(),
        })
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSE={:.4} RMSE={:.4} MAE={:.4}", self.mse, self.rmse, self.mae)?;
        match self.r2 {
            Some(r2) => write!(f, " R2={:.4}", r2),
            None => write!(f, " R2=n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_regression_metrics() {
        let y_true = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y_pred = array![1.1, 2.1, 2.9, 4.2, 4.8];

        let metrics = RegressionMetrics::compute(&y_true, &y_pred).unwrap();

        assert!(metrics.mse < 0.1);
        assert!((metrics.rmse - metrics.mse.sqrt()).abs() < 1e-12);
        assert!(metrics.r2.unwrap() > 0.9);
        assert_eq!(metrics.n_samples, 5);
    }

    #[test]
    fn test_perfect_fit() {
        let y = array![3.0, 7.0];
        let metrics = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.r2, Some(1.0));
    }

    #[test]
    fn test_constant_target_has_no_r2() {
        let metrics = RegressionMetrics::compute(&array![2.0, 2.0], &array![1.0, 3.0]).unwrap();
        assert_eq!(metrics.mse, 1.0);
        assert!(metrics.r2.is_none());
    }

    #[test]
    fn test_length_mismatch() {
        let result = RegressionMetrics::compute(&array![1.0, 2.0], &array![1.0]);
        assert!(matches!(result, Err(CropPriceError::ShapeError { .. })));
    }
}
