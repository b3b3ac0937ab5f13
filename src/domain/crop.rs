//! Crop recommendation inputs and outputs

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Crop recommended when the crop model slot is unavailable
pub const FALLBACK_CROP: &str = "Rice";

/// Number of features the crop classifier expects
pub const SOIL_FEATURES: usize = 7;

/// Soil and climate readings for a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    #[serde(rename = "N")]
    pub nitrogen: f32,
    #[serde(rename = "P")]
    pub phosphorus: f32,
    #[serde(rename = "K")]
    pub potassium: f32,
    pub temperature: f32,
    pub humidity: f32,
    pub ph: f32,
    pub rainfall: f32,
}

impl SoilSample {
    pub fn validate(&self) -> Result<(), DomainError> {
        let non_negative = [
            ("N", self.nitrogen),
            ("P", self.phosphorus),
            ("K", self.potassium),
            ("rainfall", self.rainfall),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !self.temperature.is_finite() {
            return Err(DomainError::validation("temperature must be a number"));
        }

        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(DomainError::validation(format!(
                "humidity must be between 0 and 100, got {}",
                self.humidity
            )));
        }

        if !(0.0..=14.0).contains(&self.ph) {
            return Err(DomainError::validation(format!(
                "ph must be between 0 and 14, got {}",
                self.ph
            )));
        }

        Ok(())
    }

    /// Feature vector in training column order
    pub fn features(&self) -> [f32; SOIL_FEATURES] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }
}

/// Crop suggested for a soil sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropRecommendation {
    pub crop: String,
    /// False when the fallback crop was returned instead of a model prediction
    pub predicted: bool,
}

impl CropRecommendation {
    pub fn predicted(crop: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            predicted: true,
        }
    }

    pub fn fallback() -> Self {
        Self {
            crop: FALLBACK_CROP.to_string(),
            predicted: false,
        }
    }
}
