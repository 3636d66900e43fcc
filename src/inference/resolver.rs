//! Numeric field resolution

use super::defaults::SoilDefaults;
use crate::error::{CropPriceError, Result};

/// Turns a raw form value for a numerical field into a model input
pub trait NumericResolver: Send + Sync {
    /// Resolve `field` for a request with the given soil type.
    ///
    /// `raw` is `None` when the value was absent or blank.
    fn resolve(&self, field: &str, raw: Option<&str>, soil_type: &str, defaults: &SoilDefaults) -> Result<f64>;

    /// Short name for logs and the health endpoint
    fn name(&self) -> &'static str;
}

/// Uses the supplied value, otherwise the soil default, otherwise zero
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFill;

impl NumericResolver for DefaultFill {
    fn resolve(&self, field: &str, raw: Option<&str>, soil_type: &str, defaults: &SoilDefaults) -> Result<f64> {
        match raw {
            Some(value) => parse_number(field, value),
            None => Ok(defaults.value_for(soil_type, field)),
        }
    }

    fn name(&self) -> &'static str {
        "default-fill"
    }
}

/// Every numerical field must be supplied
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl NumericResolver for Strict {
    fn resolve(&self, field: &str, raw: Option<&str>, _soil_type: &str, _defaults: &SoilDefaults) -> Result<f64> {
        match raw {
            Some(value) => parse_number(field, value),
            None => Err(CropPriceError::MissingField(field.to_string())),
        }
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CropPriceError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn test_default_fill_prefers_supplied_value() {
        let defaults = SoilDefaults::standard();
        let value = DefaultFill
            .resolve(schema::N_SOIL, Some(" 12.5 "), "Black soil", &defaults)
            .unwrap();
        assert_eq!(value, 12.5);
    }

    #[test]
    fn test_default_fill_uses_soil_default() {
        let defaults = SoilDefaults::standard();
        let value = DefaultFill
            .resolve(schema::HUMIDITY, None, "Black soil", &defaults)
            .unwrap();
        assert_eq!(value, 75.0);
        let value = DefaultFill
            .resolve(schema::HUMIDITY, None, "Unknown soil", &defaults)
            .unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_unparsable_value() {
        let defaults = SoilDefaults::standard();
        for resolver in [&DefaultFill as &dyn NumericResolver, &Strict] {
            let err = resolver
                .resolve(schema::PH, Some("acidic"), "Black soil", &defaults)
                .unwrap_err();
            assert!(matches!(err, CropPriceError::InvalidNumber { .. }));
        }
    }

    #[test]
    fn test_strict_requires_value() {
        let defaults = SoilDefaults::standard();
        let err = Strict
            .resolve(schema::RAINFALL, None, "Black soil", &defaults)
            .unwrap_err();
        assert!(matches!(err, CropPriceError::MissingField(ref f) if f == "RAINFALL"));
        assert_eq!(
            Strict.resolve(schema::RAINFALL, Some("210"), "Black soil", &defaults).unwrap(),
            210.0
        );
    }
}
