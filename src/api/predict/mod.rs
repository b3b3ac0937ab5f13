//! Prediction and advisory endpoints

pub mod advisory;
pub mod crop;
pub mod disease;
pub mod fertilizer;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_predict_router() -> Router<AppState> {
    Router::new()
        .route("/detect-disease", post(disease::detect_disease))
        .route("/detect-disease-batch", post(disease::detect_disease_batch))
        .route("/predict-crop", post(crop::predict_crop))
        .route("/predict-fertilizer", post(fertilizer::predict_fertilizer))
        .route("/subsidies", get(advisory::list_subsidies))
        .route("/ask-ai", post(advisory::ask_ai))
}
