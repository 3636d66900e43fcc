//! Inference configuration

use super::resolver::{DefaultFill, NumericResolver, Strict};
use crate::error::CropPriceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How numeric form fields are turned into model inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferencePolicy {
    /// Fill absent values from the soil defaults
    #[default]
    Lenient,
    /// Require every numeric value
    Strict,
}

impl InferencePolicy {
    /// Resolver implementing this policy
    pub fn resolver(&self) -> Box<dyn NumericResolver> {
        match self {
            InferencePolicy::Lenient => Box::new(DefaultFill),
            InferencePolicy::Strict => Box::new(Strict),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InferencePolicy::Lenient => "lenient",
            InferencePolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for InferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InferencePolicy {
    type Err = CropPriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" | "default-fill" => Ok(InferencePolicy::Lenient),
            "strict" => Ok(InferencePolicy::Strict),
            other => Err(CropPriceError::ConfigError(format!(
                "unknown inference policy {:?} (expected lenient or strict)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("lenient".parse::<InferencePolicy>().unwrap(), InferencePolicy::Lenient);
        assert_eq!(" STRICT ".parse::<InferencePolicy>().unwrap(), InferencePolicy::Strict);
        assert!("loose".parse::<InferencePolicy>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for policy in [InferencePolicy::Lenient, InferencePolicy::Strict] {
            assert_eq!(policy.to_string().parse::<InferencePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(InferencePolicy::default(), InferencePolicy::Lenient);
        assert_eq!(InferencePolicy::default().resolver().name(), "default-fill");
    }
}
