//! Agri Predict
//!
//! Agricultural prediction service:
//! - Leaf disease detection from images, singly or in batches
//! - Crop recommendation from soil and climate readings
//! - Fertilizer lookup, subsidy catalogue and a rule-based assistant

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::LabelResolver;
use infrastructure::image::ResizeNormalizer;
use infrastructure::loaders::load_remedy_table;
use infrastructure::registry::ModelRegistry;
use infrastructure::services::{DetectionLimits, DetectionPipeline};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state, loading every model slot up front
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = Arc::new(ModelRegistry::from_config(&config.models));

    let loading = Arc::clone(&registry);
    tokio::task::spawn_blocking(move || loading.load()).await?;

    let disease = &config.models.disease;
    let normalizer = ResizeNormalizer::new(disease.target_size, disease.resize_filter)?;
    let remedies = load_remedy_table(disease.remedies_path.as_deref(), &disease.default_remedy);

    let pipeline = DetectionPipeline::new(
        Arc::clone(&registry),
        Arc::new(normalizer),
        LabelResolver::new(remedies),
    )
    .with_limits(DetectionLimits {
        batch_workers: config.inference.batch_workers,
        item_timeout: Duration::from_millis(config.inference.item_timeout_ms),
    });

    info!(
        disease_model = pipeline.is_model_available(),
        batch_workers = config.inference.batch_workers,
        "Application state initialized"
    );

    Ok(AppState::new(registry, Arc::new(pipeline)))
}
