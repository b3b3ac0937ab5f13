//! Model Registry
//!
//! Owns the trained artifacts behind each named slot. Every slot is loaded at
//! most once; a slot whose artifact or label file cannot be loaded stays
//! unavailable and callers serve fallback responses instead of failing.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{info, warn};

use super::loaders::{load_fertilizer_table, load_label_map};
use super::onnx::TractArtifact;
use crate::config::ModelsConfig;
use crate::domain::crop::SOIL_FEATURES;
use crate::domain::{DomainError, FertilizerTable, InferenceArtifact, LabelMap, TargetSize};

/// Named positions in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSlot {
    Crop,
    Disease,
    Fertilizer,
}

impl ModelSlot {
    pub const ALL: [ModelSlot; 3] = [Self::Crop, Self::Disease, Self::Fertilizer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crop => "crop",
            Self::Disease => "disease",
            Self::Fertilizer => "fertilizer",
        }
    }
}

impl std::fmt::Display for ModelSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files backing a classifier slot
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub input_shape: Vec<usize>,
}

/// A classifier together with the labels for its outputs
#[derive(Clone)]
pub struct LoadedModel {
    artifact: Arc<dyn InferenceArtifact>,
    labels: Arc<LabelMap>,
}

impl LoadedModel {
    pub fn new(artifact: Arc<dyn InferenceArtifact>, labels: LabelMap) -> Self {
        Self {
            artifact,
            labels: Arc::new(labels),
        }
    }

    pub fn artifact(&self) -> &Arc<dyn InferenceArtifact> {
        &self.artifact
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("classes", &self.labels.len())
            .finish()
    }
}

/// Loads the classifier behind an enabled slot
pub(crate) type SlotLoader = fn(ModelSlot, &ModelSource) -> SlotState;

#[derive(Debug)]
pub(crate) enum SlotState {
    Ready(LoadedModel),
    Unavailable { reason: String },
}

#[derive(Debug)]
struct ClassifierSlot {
    enabled: bool,
    source: Option<ModelSource>,
    loader: SlotLoader,
    state: OnceCell<SlotState>,
}

impl ClassifierSlot {
    fn configured(enabled: bool, source: ModelSource, loader: SlotLoader) -> Self {
        Self {
            enabled,
            source: Some(source),
            loader,
            state: OnceCell::new(),
        }
    }

    fn preset(state: SlotState) -> Self {
        Self {
            enabled: matches!(state, SlotState::Ready(_)),
            source: None,
            loader: load_from_files,
            state: OnceCell::with_value(state),
        }
    }
}

#[derive(Debug)]
struct FertilizerSlot {
    table_path: Option<PathBuf>,
    state: OnceCell<(FertilizerTable, Option<String>)>,
}

/// Availability report for one slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStatus {
    pub slot: ModelSlot,
    pub enabled: bool,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Registry of the crop, disease and fertilizer slots
#[derive(Debug)]
pub struct ModelRegistry {
    crop: ClassifierSlot,
    disease: ClassifierSlot,
    fertilizer: FertilizerSlot,
}

impl ModelRegistry {
    /// Builds a registry from configuration without loading anything yet
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self::from_config_with_loader(config, load_from_files)
    }

    pub(crate) fn from_config_with_loader(config: &ModelsConfig, loader: SlotLoader) -> Self {
        let TargetSize { width, height } = config.disease.target_size;

        Self {
            crop: ClassifierSlot::configured(
                config.crop.enabled,
                ModelSource {
                    model_path: config.crop.model_path.clone(),
                    labels_path: config.crop.labels_path.clone(),
                    input_shape: vec![1, SOIL_FEATURES],
                },
                loader,
            ),
            disease: ClassifierSlot::configured(
                config.disease.enabled,
                ModelSource {
                    model_path: config.disease.model_path.clone(),
                    labels_path: config.disease.labels_path.clone(),
                    input_shape: vec![1, height as usize, width as usize, 3],
                },
                loader,
            ),
            fertilizer: FertilizerSlot {
                table_path: config.fertilizer.table_path.clone(),
                state: OnceCell::new(),
            },
        }
    }

    /// A registry whose classifier slots are all unavailable
    pub fn unavailable() -> Self {
        let unloaded = || {
            ClassifierSlot::preset(SlotState::Unavailable {
                reason: "no model configured".to_string(),
            })
        };

        Self {
            crop: unloaded(),
            disease: unloaded(),
            fertilizer: FertilizerSlot {
                table_path: None,
                state: OnceCell::new(),
            },
        }
    }

    /// Replaces a classifier slot with an already loaded model
    pub fn with_model(
        mut self,
        slot: ModelSlot,
        artifact: Arc<dyn InferenceArtifact>,
        labels: LabelMap,
    ) -> Self {
        let preset = ClassifierSlot::preset(SlotState::Ready(LoadedModel::new(artifact, labels)));

        match slot {
            ModelSlot::Crop => self.crop = preset,
            ModelSlot::Disease => self.disease = preset,
            ModelSlot::Fertilizer => {
                warn!("Fertilizer slot is table-backed; ignoring injected model")
            }
        }

        self
    }

    /// Presets the fertilizer table; ignored once the slot is initialized
    pub fn with_fertilizer_table(self, table: FertilizerTable) -> Self {
        if self.fertilizer.state.set((table, None)).is_err() {
            warn!("Fertilizer table already initialized; ignoring injected table");
        }
        self
    }

    /// Loads every slot. Failures are logged and recorded, never returned.
    pub fn load(&self) {
        for slot in ModelSlot::ALL {
            let available = self.is_available(slot);
            info!(slot = %slot, available, "Model slot initialized");
        }
    }

    /// Whether the slot can serve predictions; loads it on first query
    pub fn is_available(&self, slot: ModelSlot) -> bool {
        match slot {
            ModelSlot::Fertilizer => {
                self.fertilizer_table();
                true
            }
            _ => self.loaded(slot).is_some(),
        }
    }

    /// The loaded model behind a classifier slot, if any
    pub fn loaded(&self, slot: ModelSlot) -> Option<&LoadedModel> {
        match self.classifier_state(slot)? {
            SlotState::Ready(model) => Some(model),
            SlotState::Unavailable { .. } => None,
        }
    }

    pub fn artifact(&self, slot: ModelSlot) -> Result<Arc<dyn InferenceArtifact>, DomainError> {
        self.loaded(slot)
            .map(|model| Arc::clone(model.artifact()))
            .ok_or_else(|| DomainError::not_loaded(slot.as_str()))
    }

    pub fn label_map(&self, slot: ModelSlot) -> Result<&LabelMap, DomainError> {
        self.loaded(slot)
            .map(LoadedModel::labels)
            .ok_or_else(|| DomainError::not_loaded(slot.as_str()))
    }

    pub fn fertilizer_table(&self) -> &FertilizerTable {
        let (table, _) = self.fertilizer.state.get_or_init(|| {
            let (table, error) = load_fertilizer_table(self.fertilizer.table_path.as_deref());
            (table, error.map(|e| e.to_string()))
        });
        table
    }

    pub fn slot_status(&self) -> Vec<SlotStatus> {
        ModelSlot::ALL
            .into_iter()
            .map(|slot| match slot {
                ModelSlot::Fertilizer => {
                    self.fertilizer_table();
                    SlotStatus {
                        slot,
                        enabled: true,
                        available: true,
                        error: self
                            .fertilizer
                            .state
                            .get()
                            .and_then(|(_, error)| error.clone()),
                    }
                }
                _ => {
                    let enabled = self.classifier(slot).is_some_and(|c| c.enabled);
                    let (available, error) = match self.classifier_state(slot) {
                        Some(SlotState::Ready(_)) => (true, None),
                        Some(SlotState::Unavailable { reason }) => (false, Some(reason.clone())),
                        None => (false, None),
                    };

                    SlotStatus {
                        slot,
                        enabled,
                        available,
                        error,
                    }
                }
            })
            .collect()
    }

    fn classifier(&self, slot: ModelSlot) -> Option<&ClassifierSlot> {
        match slot {
            ModelSlot::Crop => Some(&self.crop),
            ModelSlot::Disease => Some(&self.disease),
            ModelSlot::Fertilizer => None,
        }
    }

    fn classifier_state(&self, slot: ModelSlot) -> Option<&SlotState> {
        let classifier = self.classifier(slot)?;

        Some(
            classifier
                .state
                .get_or_init(|| load_classifier(slot, classifier)),
        )
    }
}

fn load_classifier(slot: ModelSlot, classifier: &ClassifierSlot) -> SlotState {
    let Some(source) = classifier.source.as_ref().filter(|_| classifier.enabled) else {
        info!(slot = %slot, "Model slot disabled");
        return SlotState::Unavailable {
            reason: "disabled".to_string(),
        };
    };

    (classifier.loader)(slot, source)
}

fn load_from_files(slot: ModelSlot, source: &ModelSource) -> SlotState {
    let artifact = TractArtifact::load(&source.model_path, &source.input_shape);
    let labels = load_label_map(&source.labels_path);

    match (artifact, labels) {
        (Ok(artifact), Ok(labels)) => {
            info!(
                slot = %slot,
                model = %source.model_path.display(),
                classes = labels.len(),
                "Model loaded"
            );
            SlotState::Ready(LoadedModel::new(Arc::new(artifact), labels))
        }
        (artifact, labels) => {
            let reasons: Vec<String> = [artifact.err(), labels.err()]
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect();
            let error = DomainError::model_load(slot.as_str(), reasons.join("; "));

            warn!(slot = %slot, error = %error, "Model unavailable, serving fallback responses");

            SlotState::Unavailable {
                reason: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use super::*;
    use crate::config::{CropModelConfig, DiseaseModelConfig, FertilizerConfig};
    use crate::domain::MockInferenceArtifact;
    use crate::infrastructure::loaders::test_files::write_temp;

    fn labels() -> LabelMap {
        LabelMap::from_names(["Tomato_healthy".to_string(), "Tomato_Leaf_Mold".to_string()])
            .unwrap()
    }

    fn missing_files_config() -> ModelsConfig {
        ModelsConfig {
            disease: DiseaseModelConfig {
                model_path: PathBuf::from("missing/disease.onnx"),
                labels_path: PathBuf::from("missing/disease.json"),
                ..Default::default()
            },
            crop: CropModelConfig {
                enabled: false,
                ..Default::default()
            },
            fertilizer: FertilizerConfig::default(),
        }
    }

    #[test]
    fn test_missing_files_leave_slot_unavailable() {
        let registry = ModelRegistry::from_config(&missing_files_config());
        registry.load();

        assert!(!registry.is_available(ModelSlot::Disease));
        assert!(registry.loaded(ModelSlot::Disease).is_none());
    }

    #[test]
    fn test_handles_fail_with_not_loaded() {
        let registry = ModelRegistry::unavailable();

        assert!(matches!(
            registry.artifact(ModelSlot::Disease),
            Err(DomainError::NotLoaded { .. })
        ));
        assert!(matches!(
            registry.label_map(ModelSlot::Crop),
            Err(DomainError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_labels_without_model_is_unavailable() {
        let labels_path = write_temp("disease.json", r#"["Tomato_healthy"]"#);
        let config = ModelsConfig {
            disease: DiseaseModelConfig {
                model_path: PathBuf::from("missing/disease.onnx"),
                labels_path,
                ..Default::default()
            },
            ..missing_files_config()
        };
        let registry = ModelRegistry::from_config(&config);

        assert!(!registry.is_available(ModelSlot::Disease));
        let status = registry
            .slot_status()
            .into_iter()
            .find(|s| s.slot == ModelSlot::Disease)
            .unwrap();
        assert!(status.enabled);
        let error = status.error.unwrap();
        assert!(error.contains("missing/disease.onnx"));
        assert!(!error.contains("disease.json"));
    }

    #[test]
    fn test_status_reports_both_failures() {
        let registry = ModelRegistry::from_config(&missing_files_config());
        let status = registry.slot_status();

        let disease = status.iter().find(|s| s.slot == ModelSlot::Disease).unwrap();
        let error = disease.error.as_deref().unwrap();
        assert!(error.starts_with("Model load error: disease"));
        assert!(error.contains("missing/disease.onnx"));
        assert!(error.contains("missing/disease.json"));

        let crop = status.iter().find(|s| s.slot == ModelSlot::Crop).unwrap();
        assert!(!crop.enabled);
        assert_eq!(crop.error.as_deref(), Some("disabled"));

        let fertilizer = status.iter().find(|s| s.slot == ModelSlot::Fertilizer).unwrap();
        assert!(fertilizer.available);
        assert!(fertilizer.error.is_none());
    }

    #[test]
    fn test_injected_model_is_available() {
        let mut artifact = MockInferenceArtifact::new();
        artifact.expect_predict().never();

        let registry =
            ModelRegistry::unavailable().with_model(ModelSlot::Disease, Arc::new(artifact), labels());

        assert!(registry.is_available(ModelSlot::Disease));
        assert!(!registry.is_available(ModelSlot::Crop));
        assert_eq!(registry.label_map(ModelSlot::Disease).unwrap().len(), 2);
        assert!(registry.artifact(ModelSlot::Disease).is_ok());
    }

    #[test]
    fn test_fertilizer_slot_uses_injected_table() {
        let table = FertilizerTable::from_json(
            r#"{"millet": {"N": 40, "P": 20, "K": 20, "fertilizer": "FYM"}}"#,
        )
        .unwrap();
        let registry = ModelRegistry::unavailable().with_fertilizer_table(table);

        assert_eq!(registry.fertilizer_table().crops(), vec!["millet"]);
        assert!(registry.is_available(ModelSlot::Fertilizer));
    }

    #[test]
    fn test_fertilizer_table_is_set_once() {
        let first = FertilizerTable::from_json(
            r#"{"millet": {"N": 40, "P": 20, "K": 20, "fertilizer": "FYM"}}"#,
        )
        .unwrap();
        let second = FertilizerTable::from_json(
            r#"{"barley": {"N": 60, "P": 30, "K": 20, "fertilizer": "Urea"}}"#,
        )
        .unwrap();

        let registry = ModelRegistry::unavailable()
            .with_fertilizer_table(first)
            .with_fertilizer_table(second);

        assert_eq!(registry.fertilizer_table().crops(), vec!["millet"]);
    }

    static RACE_LOADS: AtomicUsize = AtomicUsize::new(0);

    fn counting_loader(_slot: ModelSlot, _source: &ModelSource) -> SlotState {
        RACE_LOADS.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        SlotState::Unavailable {
            reason: "counted".to_string(),
        }
    }

    #[test]
    fn test_concurrent_first_queries_load_once() {
        let registry = Arc::new(ModelRegistry::from_config_with_loader(
            &missing_files_config(),
            counting_loader,
        ));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    registry.is_available(ModelSlot::Disease)
                })
            })
            .collect();

        assert!(handles.into_iter().all(|h| !h.join().unwrap()));
        assert_eq!(RACE_LOADS.load(Ordering::SeqCst), 1);

        registry.load();
        assert_eq!(RACE_LOADS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slot_serialization() {
        assert_eq!(serde_json::to_string(&ModelSlot::Disease).unwrap(), "\"disease\"");
    }
}
