//! Health check endpoints for liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;
use crate::infrastructure::registry::{ModelSlot, SlotStatus};

use super::state::AppState;

/// Detailed health response with per-slot status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Status of one model slot
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SlotStatus> for HealthCheck {
    fn from(slot: SlotStatus) -> Self {
        let status = match (slot.available, slot.enabled) {
            (true, _) => HealthStatus::Healthy,
            (false, false) => HealthStatus::Degraded,
            (false, true) => HealthStatus::Unhealthy,
        };

        Self {
            name: slot.slot.to_string(),
            status,
            enabled: slot.enabled,
            message: slot.error,
        }
    }
}

/// GET /ping
pub async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /health
///
/// Always 200 while the process serves requests; reports every slot.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<HealthCheck> = state
        .registry
        .slot_status()
        .into_iter()
        .map(HealthCheck::from)
        .collect();

    let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// GET /ready
///
/// Degraded when the disease model is unavailable; detections then answer
/// with the unavailable result, so the service still accepts requests.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let disease = state
        .registry
        .slot_status()
        .into_iter()
        .find(|s| s.slot == ModelSlot::Disease)
        .map(HealthCheck::from);

    let overall_status = match &disease {
        Some(check) if check.status == HealthStatus::Healthy => HealthStatus::Healthy,
        _ => HealthStatus::Degraded,
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: disease.map(|check| vec![check]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }

    #[test]
    fn test_check_from_slot_status() {
        let check = HealthCheck::from(SlotStatus {
            slot: ModelSlot::Disease,
            enabled: true,
            available: false,
            error: Some("Model load error: disease - missing file".to_string()),
        });

        assert_eq!(check.name, "disease");
        assert_eq!(check.status, HealthStatus::Unhealthy);
        assert!(check.message.is_some());

        let disabled = HealthCheck::from(SlotStatus {
            slot: ModelSlot::Crop,
            enabled: false,
            available: false,
            error: None,
        });
        assert_eq!(disabled.status, HealthStatus::Degraded);
    }

    #[test]
    fn test_health_response_skips_empty_fields() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(!json.contains("checks"));
    }
}
