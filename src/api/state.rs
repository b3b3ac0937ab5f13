//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::registry::ModelRegistry;
use crate::infrastructure::services::{CropService, DetectionPipeline};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub detection: Arc<DetectionPipeline>,
    pub crop: CropService,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, detection: Arc<DetectionPipeline>) -> Self {
        Self {
            crop: CropService::new(Arc::clone(&registry)),
            registry,
            detection,
        }
    }
}
