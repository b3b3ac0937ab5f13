//! Domain layer - Core prediction logic and entities

pub mod assistant;
pub mod crop;
pub mod detection;
pub mod error;
pub mod fertilizer;
pub mod subsidy;

pub use crop::{CropRecommendation, SoilSample, FALLBACK_CROP};
pub use detection::{
    argmax, BatchItem, BatchOutcome, DetectionResult, HealthStatus, ImageNormalizer, ImageTensor,
    InferenceArtifact, ItemError, LabelMap, LabelResolver, RemedyTable, TargetSize,
    DEFAULT_REMEDY, UNKNOWN_LABEL,
};
pub use error::DomainError;
pub use fertilizer::{FertilizerProfile, FertilizerRecommendation, FertilizerTable};
pub use subsidy::{subsidy_schemes, SubsidyScheme};

#[cfg(test)]
pub use detection::{MockImageNormalizer, MockInferenceArtifact};
