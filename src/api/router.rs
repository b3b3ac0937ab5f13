use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::predict;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Router options that do not live in the application state
#[derive(Clone)]
pub struct RouterOptions {
    pub max_upload_bytes: usize,
    pub metrics: Option<PrometheusMetrics>,
    pub metrics_path: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            metrics: None,
            metrics_path: "/metrics".to_string(),
        }
    }
}

/// Create the full router with application state
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .merge(predict::create_predict_router())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(options.max_upload_bytes))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    if let Some(metrics) = options.metrics {
        router = router.merge(create_metrics_router(metrics, &options.metrics_path));
    }

    router
}
