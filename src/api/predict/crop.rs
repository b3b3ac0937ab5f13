//! Crop recommendation endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CropResponse, Json};
use crate::domain::SoilSample;

/// POST /predict-crop
pub async fn predict_crop(
    State(state): State<AppState>,
    Json(sample): Json<SoilSample>,
) -> Result<Json<CropResponse>, ApiError> {
    debug!(?sample, "Recommending crop");

    let crop = state.crop.clone();
    let recommendation = tokio::task::spawn_blocking(move || crop.recommend(&sample))
        .await
        .map_err(|e| ApiError::internal(format!("Crop prediction task failed: {}", e)))??;

    Ok(Json(CropResponse {
        recommended_crop: recommendation.crop,
    }))
}
