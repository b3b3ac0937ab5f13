//! Label maps, remedy tables and the resolver that turns scores into results

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Label reported when an output index has no entry in the label map
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Remedy reported for labels missing from the remedy table
pub const DEFAULT_REMEDY: &str = "No remedy information available.";

/// Remedy reported when the disease model is not loaded
pub const UNAVAILABLE_REMEDY: &str =
    "Disease model is unavailable. No remedy information can be given.";

/// Bidirectional mapping between class index and class name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelMap {
    by_index: BTreeMap<usize, String>,
    by_name: HashMap<String, usize>,
}

/// On-disk label formats: `{"name": index}` as written at training time, or
/// a plain list of names in index order
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelFile {
    ClassIndices(HashMap<String, usize>),
    Names(Vec<String>),
}

impl LabelMap {
    /// Builds a map from `name -> index` pairs, rejecting duplicate indices
    /// and duplicate names
    pub fn from_class_indices(
        indices: impl IntoIterator<Item = (String, usize)>,
    ) -> Result<Self, DomainError> {
        let mut map = Self::default();

        for (name, index) in indices {
            if let Some(existing) = map.by_index.get(&index) {
                return Err(DomainError::validation(format!(
                    "Class index {} assigned to both '{}' and '{}'",
                    index, existing, name
                )));
            }
            if let Some(existing) = map.by_name.get(&name) {
                return Err(DomainError::validation(format!(
                    "Class '{}' assigned to both index {} and {}",
                    name, existing, index
                )));
            }
            map.by_name.insert(name.clone(), index);
            map.by_index.insert(index, name);
        }

        Ok(map)
    }

    pub fn from_names(names: impl IntoIterator<Item = String>) -> Result<Self, DomainError> {
        Self::from_class_indices(names.into_iter().enumerate().map(|(i, n)| (n, i)))
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let file: LabelFile = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid label file: {}", e)))?;

        match file {
            LabelFile::ClassIndices(indices) => Self::from_class_indices(indices),
            LabelFile::Names(names) => Self::from_names(names),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Resolves an index, falling back to [`UNKNOWN_LABEL`]
    pub fn label_or_unknown(&self, index: usize) -> &str {
        self.get(index).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

/// Advisory text keyed by class name
#[derive(Debug, Clone, PartialEq)]
pub struct RemedyTable {
    entries: HashMap<String, String>,
    default_remedy: String,
}

impl RemedyTable {
    pub fn new(entries: HashMap<String, String>, default_remedy: impl Into<String>) -> Self {
        Self {
            entries,
            default_remedy: default_remedy.into(),
        }
    }

    /// Remedies for the PlantVillage pepper, potato and tomato classes
    pub fn builtin() -> Self {
        let entries = BUILTIN_REMEDIES
            .iter()
            .map(|(label, remedy)| (label.to_string(), remedy.to_string()))
            .collect();

        Self::new(entries, DEFAULT_REMEDY)
    }

    /// Parses a `{"label": "remedy"}` JSON object
    pub fn from_json(json: &str, default_remedy: impl Into<String>) -> Result<Self, DomainError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| DomainError::validation(format!("Invalid remedy file: {}", e)))?;

        Ok(Self::new(entries, default_remedy))
    }

    pub fn with_default_remedy(mut self, default_remedy: impl Into<String>) -> Self {
        self.default_remedy = default_remedy.into();
        self
    }

    pub fn get(&self, label: &str) -> &str {
        self.entries
            .get(label)
            .map(String::as_str)
            .unwrap_or(&self.default_remedy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RemedyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_REMEDIES: &[(&str, &str)] = &[
    (
        "Pepper__bell___Bacterial_spot",
        "Use disease-free seeds, avoid overhead watering, and apply copper-based fungicides.",
    ),
    (
        "Pepper__bell___healthy",
        "Your pepper plant is healthy. Maintain good watering and fertilization practices.",
    ),
    (
        "Potato___Early_blight",
        "Rotate crops, remove infected leaves, and apply fungicides containing chlorothalonil or mancozeb.",
    ),
    (
        "Potato___healthy",
        "Your potato plant is healthy. Maintain proper irrigation and fertilization.",
    ),
    (
        "Potato___Late_blight",
        "Use copper fungicides, remove infected plants, and avoid waterlogged conditions.",
    ),
    (
        "Tomato_Bacterial_spot",
        "Avoid overhead watering, use disease-free seeds, and apply copper sprays.",
    ),
    (
        "Tomato_Early_blight",
        "Remove affected leaves, stake plants for air circulation, and use fungicides like mancozeb.",
    ),
    (
        "Tomato_healthy",
        "Your tomato plant is healthy. Continue good farming practices.",
    ),
    (
        "Tomato_Spider_mites_Two_spotted_spider_mite",
        "Spray with miticides or neem oil, maintain proper field hygiene.",
    ),
    (
        "Tomato__Tomato_YellowLeaf__Curl_Virus",
        "Control whiteflies, remove infected plants, and use resistant varieties.",
    ),
    (
        "Tomato_Leaf_Mold",
        "Improve air circulation, avoid overcrowding, and use fungicides like chlorothalonil.",
    ),
];

/// Binary plant health derived from the resolved label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Good,
    Bad,
    Unavailable,
}

impl HealthStatus {
    /// `Good` when the label contains "healthy" in any casing, otherwise `Bad`
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("healthy") {
            Self::Good
        } else {
            Self::Bad
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single disease detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub label: String,
    pub confidence: f32,
    pub remedy: String,
    pub status: HealthStatus,
}

impl DetectionResult {
    /// The result every call returns while the disease model is not loaded
    pub fn unavailable() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            confidence: 0.0,
            remedy: UNAVAILABLE_REMEDY.to_string(),
            status: HealthStatus::Unavailable,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.status == HealthStatus::Unavailable
    }
}

/// Index and value of the highest score; the first maximum wins ties and
/// NaN scores are never selected
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best, (index, score)| match best {
            Some((_, best_score)) if score <= best_score => best,
            _ => Some((index, score)),
        })
}

/// Maps raw class scores to a [`DetectionResult`]
#[derive(Debug, Clone, Default)]
pub struct LabelResolver {
    remedies: RemedyTable,
}

impl LabelResolver {
    pub fn new(remedies: RemedyTable) -> Self {
        Self { remedies }
    }

    pub fn resolve(&self, labels: &LabelMap, scores: &[f32]) -> DetectionResult {
        let (label, confidence) = match argmax(scores) {
            Some((index, score)) => (labels.label_or_unknown(index), score.clamp(0.0, 1.0)),
            None => (UNKNOWN_LABEL, 0.0),
        };

        DetectionResult {
            label: label.to_string(),
            confidence,
            remedy: self.remedies.get(label).to_string(),
            status: HealthStatus::from_label(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelMap {
        LabelMap::from_names(
            ["Potato___Late_blight", "Tomato_healthy", "Tomato_Leaf_Mold"]
                .into_iter()
                .map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_argmax_first_maximum_wins() {
        assert_eq!(argmax(&[0.5, 0.5, 0.0]), Some((0, 0.5)));
        assert_eq!(argmax(&[0.1, 0.7, 0.7]), Some((1, 0.7)));
    }

    #[test]
    fn test_argmax_skips_nan_and_empty() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN, 0.2]), Some((1, 0.2)));
        assert_eq!(argmax(&[f32::NAN]), None);
    }

    #[test]
    fn test_status_from_label() {
        assert_eq!(HealthStatus::from_label("Tomato_healthy"), HealthStatus::Good);
        assert_eq!(HealthStatus::from_label("Pepper__bell___HEALTHY"), HealthStatus::Good);
        assert_eq!(HealthStatus::from_label("Potato___Late_blight"), HealthStatus::Bad);
        assert_eq!(HealthStatus::from_label(UNKNOWN_LABEL), HealthStatus::Bad);
    }

    #[test]
    fn test_resolve_known_label() {
        let resolver = LabelResolver::default();
        let result = resolver.resolve(&labels(), &[0.1, 0.8, 0.1]);

        assert_eq!(result.label, "Tomato_healthy");
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.status, HealthStatus::Good);
        assert!(result.remedy.contains("tomato plant is healthy"));
    }

    #[test]
    fn test_resolve_tie_uses_first_index() {
        let resolver = LabelResolver::default();
        let result = resolver.resolve(&labels(), &[0.5, 0.5, 0.0]);

        assert_eq!(result.label, "Potato___Late_blight");
        assert_eq!(result.status, HealthStatus::Bad);
    }

    #[test]
    fn test_resolve_unmapped_index_is_unknown() {
        let resolver = LabelResolver::default();
        let result = resolver.resolve(&labels(), &[0.0, 0.1, 0.1, 0.8]);

        assert_eq!(result.label, UNKNOWN_LABEL);
        assert_eq!(result.status, HealthStatus::Bad);
        assert_eq!(result.remedy, DEFAULT_REMEDY);
    }

    #[test]
    fn test_label_without_remedy_uses_default() {
        let resolver = LabelResolver::new(
            RemedyTable::new(HashMap::new(), "Consult your local agriculture officer."),
        );
        let result = resolver.resolve(&labels(), &[0.0, 0.0, 1.0]);

        assert_eq!(result.label, "Tomato_Leaf_Mold");
        assert_eq!(result.remedy, "Consult your local agriculture officer.");
    }

    #[test]
    fn test_label_map_from_class_indices_json() {
        let map = LabelMap::from_json(r#"{"Tomato_healthy": 1, "Potato___healthy": 0}"#).unwrap();

        assert_eq!(map.get(0), Some("Potato___healthy"));
        assert_eq!(map.index_of("Tomato_healthy"), Some(1));
        assert_eq!(map.label_or_unknown(7), UNKNOWN_LABEL);
    }

    #[test]
    fn test_label_map_from_names_json() {
        let map = LabelMap::from_json(r#"["a", "b", "c"]"#).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(2), Some("c"));
    }

    #[test]
    fn test_label_map_rejects_duplicate_index() {
        let result = LabelMap::from_json(r#"{"a": 0, "b": 0}"#);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_label_map_rejects_duplicate_name() {
        let result = LabelMap::from_json(r#"["Tomato_healthy", "Potato___Early_blight", "Tomato_healthy"]"#);
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = LabelMap::from_class_indices([("a".to_string(), 0), ("a".to_string(), 1)]);
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_remedy_table_from_json() {
        let table =
            RemedyTable::from_json(r#"{"Tomato_Leaf_Mold": "Prune."}"#, DEFAULT_REMEDY).unwrap();
        assert_eq!(table.get("Tomato_Leaf_Mold"), "Prune.");
        assert_eq!(table.get("Corn_rust"), DEFAULT_REMEDY);
    }

    #[test]
    fn test_unavailable_result() {
        let result = DetectionResult::unavailable();
        assert!(result.is_unavailable());
        assert_eq!(result.label, UNKNOWN_LABEL);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&HealthStatus::Good).unwrap(), "\"Good\"");
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unavailable).unwrap(),
            "\"Unavailable\""
        );
    }
}
