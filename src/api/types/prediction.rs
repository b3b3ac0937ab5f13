//! Prediction endpoint bodies

use serde::{Deserialize, Serialize};

use crate::domain::{BatchOutcome, DetectionResult, HealthStatus, SubsidyScheme};

/// Disease detection response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub disease: String,
    pub confidence: f32,
    pub remedy: String,
    pub status: HealthStatus,
}

impl From<DetectionResult> for DetectionResponse {
    fn from(result: DetectionResult) -> Self {
        Self {
            disease: result.label,
            confidence: result.confidence,
            remedy: result.remedy,
            status: result.status,
        }
    }
}

/// One entry of a batch response: a detection or the error for that file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItemResponse {
    Detected {
        filename: String,
        #[serde(flatten)]
        detection: DetectionResponse,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl From<BatchOutcome> for BatchItemResponse {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Detected { name, result } => Self::Detected {
                filename: name,
                detection: result.into(),
            },
            BatchOutcome::Failed(item) => Self::Failed {
                filename: item.name,
                error: item.error,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetectionResponse {
    pub results: Vec<BatchItemResponse>,
}

impl BatchDetectionResponse {
    pub fn new(outcomes: Vec<BatchOutcome>) -> Self {
        Self {
            results: outcomes.into_iter().map(BatchItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropResponse {
    pub recommended_crop: String,
}

/// Form fields of a fertilizer request; the nutrient readings are accepted
/// but the recommendation is keyed on the crop alone
#[derive(Debug, Clone, Deserialize)]
pub struct FertilizerForm {
    #[serde(rename = "N")]
    pub nitrogen: f32,
    #[serde(rename = "P")]
    pub phosphorus: f32,
    #[serde(rename = "K")]
    pub potassium: f32,
    #[serde(default)]
    pub crop: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsidiesResponse {
    pub subsidy_schemes: Vec<SubsidyScheme>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub reply: String,
}
