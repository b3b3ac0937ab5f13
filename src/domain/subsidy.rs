//! Government subsidy schemes for farmers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyScheme {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub description: String,
}

/// The published scheme catalogue
pub fn subsidy_schemes() -> Vec<SubsidyScheme> {
    SCHEMES
        .iter()
        .enumerate()
        .map(|(i, (name, scheme_type, description))| SubsidyScheme {
            id: i as u32 + 1,
            name: name.to_string(),
            scheme_type: scheme_type.to_string(),
            description: description.to_string(),
        })
        .collect()
}

const SCHEMES: &[(&str, &str, &str)] = &[
    (
        "PM-KISAN",
        "Central Sector",
        "Provides Rs.6000 annually to farmers in three installments.",
    ),
    (
        "PM-KMY",
        "Central Sector",
        "Pension scheme for small and marginal farmers with monthly pension benefits.",
    ),
    (
        "PMFBY",
        "Central Sector",
        "Pradhan Mantri Fasal Bima Yojana offers crop insurance against natural calamities.",
    ),
    (
        "Rashtriya Krishi Vikas Yojana (RKVY)",
        "State Scheme",
        "Supports holistic agricultural development projects in states.",
    ),
    (
        "Soil Health Card Scheme",
        "Central Sector",
        "Provides soil health cards to farmers to improve productivity.",
    ),
    (
        "National Food Security Mission (NFSM)",
        "Central Sector",
        "Promotes sustainable increases in production of rice, wheat, pulses, and coarse cereals.",
    ),
    (
        "Pradhan Mantri Krishi Sinchai Yojana (PMKSY)",
        "Central Sector",
        "Focuses on irrigation and 'More Crop Per Drop'.",
    ),
    (
        "Dairy Entrepreneurship Development Scheme (DEDS)",
        "State + Central",
        "Provides subsidy for setting up small dairy units.",
    ),
    (
        "Agri Infrastructure Fund (AIF)",
        "Central Sector",
        "Credit support for building post-harvest infrastructure and community farming assets.",
    ),
    (
        "Neem Coated Urea Subsidy",
        "Central Sector",
        "Subsidized urea coated with neem oil to improve nutrient efficiency and reduce black marketing.",
    ),
];
