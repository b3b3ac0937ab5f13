//! Infrastructure services

mod crop_service;
mod detection_service;

pub use crop_service::CropService;
pub use detection_service::{DetectionLimits, DetectionPipeline};
