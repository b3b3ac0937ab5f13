//! Subsidy catalogue and farming assistant handlers

use crate::api::types::{ApiError, AskRequest, AskResponse, Json, SubsidiesResponse};
use crate::domain::{assistant, subsidy_schemes};

/// GET /subsidies
pub async fn list_subsidies() -> Json<SubsidiesResponse> {
    Json(SubsidiesResponse {
        subsidy_schemes: subsidy_schemes(),
    })
}

/// POST /ask-ai
pub async fn ask_ai(Json(request): Json<AskRequest>) -> Result<Json<AskResponse>, ApiError> {
    let message = request
        .message
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;

    Ok(Json(AskResponse {
        reply: assistant::reply_to(&message),
    }))
}
