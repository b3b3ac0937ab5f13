//! Crop recommendation service

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{argmax, CropRecommendation, DomainError, SoilSample};
use crate::infrastructure::registry::{ModelRegistry, ModelSlot};

/// Recommends a crop from soil readings using the crop slot of the registry
#[derive(Debug, Clone)]
pub struct CropService {
    registry: Arc<ModelRegistry>,
}

impl CropService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn is_model_available(&self) -> bool {
        self.registry.is_available(ModelSlot::Crop)
    }

    pub fn recommend(&self, sample: &SoilSample) -> Result<CropRecommendation, DomainError> {
        sample.validate()?;

        let Some(model) = self.registry.loaded(ModelSlot::Crop) else {
            warn!("Crop model unavailable, returning fallback crop");
            return Ok(CropRecommendation::fallback());
        };

        let features = sample.features();
        let scores = model
            .artifact()
            .predict(&[1, features.len()], &features)?;

        let crop = match argmax(&scores) {
            Some((index, _)) => model.labels().label_or_unknown(index),
            None => return Err(DomainError::inference("Crop model returned no scores")),
        };

        debug!(crop = %crop, "Crop recommended");
        Ok(CropRecommendation::predicted(crop))
    }
}
