//! Request and response types shared by the handlers

pub mod error;
pub mod json;
pub mod prediction;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use prediction::{
    AskRequest, AskResponse, BatchDetectionResponse, BatchItemResponse, CropResponse,
    DetectionResponse, FertilizerForm, SubsidiesResponse,
};
