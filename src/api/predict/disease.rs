//! Disease detection endpoint handlers

use std::sync::Arc;

use axum::extract::{multipart::Field, Multipart, State};
use bytes::Bytes;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, BatchDetectionResponse, DetectionResponse, Json};
use crate::domain::BatchItem;

/// Upload extensions accepted by the detection endpoints
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

const SINGLE_FIELD: &str = "image";
const BATCH_FIELD: &str = "images";

/// Accepts names whose text after the last `.` is an allowed extension
pub fn is_allowed_file(filename: &str) -> bool {
    filename.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// POST /detect-disease
pub async fn detect_disease(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() != Some(SINGLE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() || !is_allowed_file(&filename) {
            return Err(ApiError::bad_request("Invalid file. Upload JPG/PNG under 5MB."));
        }

        let bytes = read_field(field, &filename).await?;
        debug!(filename = %filename, size = bytes.len(), "Detecting disease");

        let result = Arc::clone(&state.detection)
            .detect_one_blocking(bytes)
            .await?;

        return Ok(Json(result.into()));
    }

    Err(ApiError::bad_request(
        "Upload image with field name 'image'.",
    ))
}

/// POST /detect-disease-batch
///
/// Files without a name are skipped; a file that fails to decode or predict
/// is reported in place without failing the request.
pub async fn detect_disease_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchDetectionResponse>, ApiError> {
    let mut items = Vec::new();

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() != Some(BATCH_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = read_field(field, &filename).await?;
        items.push(BatchItem::new(filename, bytes));
    }

    if items.is_empty() {
        return Err(ApiError::bad_request("No files uploaded"));
    }

    let total = items.len();
    let outcomes = Arc::clone(&state.detection)
        .detect_batch_concurrent(items)
        .await;

    info!(
        submitted = total,
        processed = outcomes.len(),
        failed = outcomes.iter().filter(|o| !o.is_detected()).count(),
        "Batch detection completed"
    );

    Ok(Json(BatchDetectionResponse::new(outcomes)))
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>, ApiError> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), format!("Failed to read multipart field: {}", e.body_text())))
}

async fn read_field(field: Field<'_>, filename: &str) -> Result<Bytes, ApiError> {
    field.bytes().await.map_err(|e| {
        ApiError::new(
            e.status(),
            format!("Failed to read file '{}': {}", filename, e.body_text()),
        )
    })
}
