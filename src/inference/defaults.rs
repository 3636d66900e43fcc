//! Per-soil default agronomic profiles

use crate::schema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typical nutrient and climate values for one soil type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temp: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub ph: f64,
}

impl SoilProfile {
    /// Default for a numerical schema field, `None` for fields the profile
    /// does not cover
    pub fn value_for(&self, field: &str) -> Option<f64> {
        match field {
            schema::N_SOIL => Some(self.n),
            schema::P_SOIL => Some(self.p),
            schema::K_SOIL => Some(self.k),
            schema::TEMPERATURE => Some(self.temp),
            schema::HUMIDITY => Some(self.humidity),
            schema::RAINFALL => Some(self.rainfall),
            schema::PH => Some(self.ph),
            _ => None,
        }
    }
}

/// Soil label to default profile lookup.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilDefaults {
    profiles: HashMap<String, SoilProfile>,
}

impl SoilDefaults {
    /// Empty table, every lookup falls back to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// The ten soil types offered by the form
    pub fn standard() -> Self {
        let rows: [(&str, [f64; 7]); 10] = [
            // N, P, K, TEMP, HUMIDITY, RAINFALL, PH
            ("Alluvial soil", [75.0, 40.0, 40.0, 26.0, 80.0, 220.0, 6.5]),
            ("Black soil", [80.0, 45.0, 50.0, 28.0, 75.0, 200.0, 6.8]),
            ("Red soil", [70.0, 35.0, 30.0, 27.0, 78.0, 180.0, 6.0]),
            ("Laterite soil", [60.0, 30.0, 35.0, 29.0, 72.0, 160.0, 5.8]),
            ("Arid soil", [40.0, 20.0, 15.0, 35.0, 50.0, 90.0, 7.2]),
            ("Forest soil", [85.0, 50.0, 55.0, 22.0, 85.0, 250.0, 6.7]),
            ("Peaty soil", [90.0, 55.0, 60.0, 24.0, 88.0, 280.0, 5.5]),
            ("Loamy soil", [78.0, 42.0, 46.0, 25.0, 76.0, 210.0, 6.4]),
            ("Sandy soil", [55.0, 28.0, 30.0, 32.0, 60.0, 150.0, 7.0]),
            ("Clay soil", [65.0, 38.0, 42.0, 23.0, 82.0, 230.0, 6.9]),
        ];

        rows.into_iter()
            .fold(Self::new(), |table, (soil, [n, p, k, temp, humidity, rainfall, ph])| {
                table.with_profile(
                    soil,
                    SoilProfile {
                        n,
                        p,
                        k,
                        temp,
                        humidity,
                        rainfall,
                        ph,
                    },
                )
            })
    }

    /// Add or replace the profile for a soil type
    pub fn with_profile(mut self, soil: impl Into<String>, profile: SoilProfile) -> Self {
        self.profiles.insert(soil.into(), profile);
        self
    }

    /// Profile for an exact soil label
    pub fn get(&self, soil: &str) -> Option<&SoilProfile> {
        self.profiles.get(soil)
    }

    /// Default value of `field` for `soil`, 0.0 when either is unknown
    pub fn value_for(&self, soil: &str, field: &str) -> f64 {
        self.get(soil)
            .and_then(|profile| profile.value_for(field))
            .unwrap_or(0.0)
    }

    /// Known soil labels, sorted
    pub fn soils(&self) -> Vec<&str> {
        let mut soils: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        soils.sort_unstable();
        soils
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
