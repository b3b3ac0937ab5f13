//! Per-crop fertilizer recommendations

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Ideal nutrient levels and fertilizer mix for one crop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerProfile {
    #[serde(rename = "N")]
    pub nitrogen: u32,
    #[serde(rename = "P")]
    pub phosphorus: u32,
    #[serde(rename = "K")]
    pub potassium: u32,
    pub fertilizer: String,
}

/// Recommendation returned for a crop lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerRecommendation {
    pub crop: String,
    #[serde(rename = "ideal_N")]
    pub ideal_nitrogen: u32,
    #[serde(rename = "ideal_P")]
    pub ideal_phosphorus: u32,
    #[serde(rename = "ideal_K")]
    pub ideal_potassium: u32,
    pub recommended_fertilizer: String,
}

/// Lookup table keyed by lowercase crop name
#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerTable {
    profiles: HashMap<String, FertilizerProfile>,
}

impl FertilizerTable {
    pub fn new(profiles: HashMap<String, FertilizerProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|(crop, profile)| (normalize_crop(&crop), profile))
            .collect();

        Self { profiles }
    }

    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|(crop, n, p, k, fertilizer)| {
                (
                    crop.to_string(),
                    FertilizerProfile {
                        nitrogen: *n,
                        phosphorus: *p,
                        potassium: *k,
                        fertilizer: fertilizer.to_string(),
                    },
                )
            })
            .collect();

        Self::new(profiles)
    }

    /// Parses a `{"crop": {"N": .., "P": .., "K": .., "fertilizer": ".."}}` object
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let profiles: HashMap<String, FertilizerProfile> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid fertilizer table: {}", e)))?;

        Ok(Self::new(profiles))
    }

    /// Looks up a crop ignoring case and surrounding whitespace
    pub fn recommend(&self, crop: &str) -> Result<FertilizerRecommendation, DomainError> {
        let key = normalize_crop(crop);
        let profile = self
            .profiles
            .get(&key)
            .ok_or_else(|| DomainError::not_found(format!("Crop '{}' not found in database", key)))?;

        Ok(FertilizerRecommendation {
            crop: capitalize(&key),
            ideal_nitrogen: profile.nitrogen,
            ideal_phosphorus: profile.phosphorus,
            ideal_potassium: profile.potassium,
            recommended_fertilizer: profile.fertilizer.clone(),
        })
    }

    /// Known crop names, sorted
    pub fn crops(&self) -> Vec<&str> {
        let mut crops: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        crops.sort_unstable();
        crops
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for FertilizerTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_crop(crop: &str) -> String {
    crop.trim().to_lowercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const BUILTIN_PROFILES: &[(&str, u32, u32, u32, &str)] = &[
    ("rice", 90, 40, 40, "Urea (100 kg/acre), DAP (50 kg/acre), MOP (40 kg/acre)"),
    ("wheat", 120, 45, 45, "Urea (120 kg/acre), SSP (50 kg/acre), MOP (45 kg/acre)"),
    ("maize", 85, 55, 60, "Urea (90 kg/acre), DAP (55 kg/acre), Potash (60 kg/acre)"),
    ("sugarcane", 100, 60, 50, "Urea (150 kg/acre), SSP (60 kg/acre), Potash (50 kg/acre)"),
    ("cotton", 100, 50, 50, "Urea (110 kg/acre), DAP (50 kg/acre), Potash (50 kg/acre)"),
    ("banana", 60, 40, 50, "Urea (200 g/plant), SSP (100 g/plant), MOP (150 g/plant)"),
    ("tomato", 50, 40, 50, "Urea (80 kg/acre), DAP (40 kg/acre), Potash (50 kg/acre)"),
    ("potato", 110, 50, 45, "Urea (100 kg/acre), SSP (50 kg/acre), Potash (45 kg/acre)"),
    ("groundnut", 80, 40, 40, "Gypsum (200 kg/acre), SSP (40 kg/acre), Potash (40 kg/acre)"),
    ("soybean", 90, 60, 40, "DAP (60 kg/acre), SSP (40 kg/acre), Potash (40 kg/acre)"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_ignores_case_and_whitespace() {
        let table = FertilizerTable::builtin();
        let rec = table.recommend("  Wheat ").unwrap();

        assert_eq!(rec.crop, "Wheat");
        assert_eq!(rec.ideal_nitrogen, 120);
        assert!(rec.recommended_fertilizer.starts_with("Urea (120 kg/acre)"));
    }

    #[test]
    fn test_recommend_unknown_crop() {
        let err = FertilizerTable::builtin().recommend("quinoa").unwrap_err();
        assert_eq!(err.to_string(), "Not found: Crop 'quinoa' not found in database");
    }

    #[test]
    fn test_builtin_has_ten_crops() {
        let table = FertilizerTable::builtin();
        assert_eq!(table.len(), 10);
        assert_eq!(table.crops().first(), Some(&"banana"));
    }

    #[test]
    fn test_from_json_normalizes_keys() {
        let table = FertilizerTable::from_json(
            r#"{"Millet": {"N": 40, "P": 20, "K": 20, "fertilizer": "FYM (5 t/acre)"}}"#,
        )
        .unwrap();

        assert_eq!(table.recommend("millet").unwrap().ideal_potassium, 20);
    }

    #[test]
    fn test_recommendation_serialization() {
        let rec = FertilizerTable::builtin().recommend("rice").unwrap();
        let json = serde_json::to_string(&rec).unwrap();

        assert!(json.contains("\"ideal_N\":90"));
        assert!(json.contains("\"recommended_fertilizer\""));
    }
}
