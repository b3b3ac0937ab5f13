//! Fertilizer recommendation endpoint handler

use axum::extract::{rejection::FormRejection, Form, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, FertilizerForm, Json};
use crate::domain::FertilizerRecommendation;

/// POST /predict-fertilizer
pub async fn predict_fertilizer(
    State(state): State<AppState>,
    form: Result<Form<FertilizerForm>, FormRejection>,
) -> Result<Json<FertilizerRecommendation>, ApiError> {
    let Form(form) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;

    debug!(
        nitrogen = form.nitrogen,
        phosphorus = form.phosphorus,
        potassium = form.potassium,
        crop = %form.crop,
        "Recommending fertilizer"
    );

    let recommendation = state.registry.fertilizer_table().recommend(&form.crop)?;

    Ok(Json(recommendation))
}
