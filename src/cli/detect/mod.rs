//! Detect command - disease detection on local files without the HTTP server

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use crate::api::types::BatchItemResponse;
use crate::config::AppConfig;
use crate::domain::{BatchItem, BatchOutcome, ItemError};
use crate::infrastructure::logging;
use crate::infrastructure::services::DetectionPipeline;

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Image files to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub async fn run(args: DetectArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    if !state.detection.is_model_available() {
        warn!("Disease model unavailable; every image will be reported as Unavailable");
    }

    let pipeline = Arc::clone(&state.detection);
    let total = args.files.len();
    let failed = tokio::task::spawn_blocking(move || {
        write_detections(&pipeline, &args.files, std::io::stdout().lock())
    })
    .await??;

    info!(total, failed, "Detection finished");

    Ok(())
}

/// Writes one JSON line per file in argument order; returns the failure count
fn write_detections<W: Write>(
    pipeline: &DetectionPipeline,
    files: &[PathBuf],
    mut out: W,
) -> anyhow::Result<usize> {
    let mut read_errors = Vec::with_capacity(files.len());
    let mut items = Vec::with_capacity(files.len());

    for path in files {
        let name = path.display().to_string();
        match std::fs::read(path) {
            Ok(bytes) => {
                items.push(BatchItem::new(name, bytes));
                read_errors.push(None);
            }
            Err(e) => read_errors.push(Some(ItemError {
                name,
                error: format!("Failed to read file: {}", e),
            })),
        }
    }

    let mut detections = pipeline.detect_batch(items);
    let mut failed = 0;

    for read_error in read_errors {
        let outcome = match read_error {
            Some(err) => BatchOutcome::Failed(err),
            None => match detections.next() {
                Some(outcome) => outcome,
                None => break,
            },
        };

        if !outcome.is_detected() {
            failed += 1;
        }

        serde_json::to_writer(&mut out, &BatchItemResponse::from(outcome))?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(failed)
}
