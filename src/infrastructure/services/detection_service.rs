//! Disease detection pipeline
//!
//! Orchestrates the model registry, image normalizer and label resolver into
//! single-image and batch detection. Each batch item is isolated: a corrupt
//! upload or failed forward pass becomes an item error and the remaining
//! items are still processed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::domain::{
    BatchItem, BatchOutcome, DetectionResult, DomainError, ImageNormalizer, ItemError,
    LabelResolver,
};
use crate::infrastructure::observability::{record_detection, record_detection_failure};
use crate::infrastructure::registry::{ModelRegistry, ModelSlot};

/// Concurrency and time limits for detections run off the async runtime
#[derive(Debug, Clone, Copy)]
pub struct DetectionLimits {
    pub batch_workers: usize,
    pub item_timeout: Duration,
}

impl Default for DetectionLimits {
    fn default() -> Self {
        Self {
            batch_workers: 4,
            item_timeout: Duration::from_secs(10),
        }
    }
}

pub struct DetectionPipeline {
    registry: Arc<ModelRegistry>,
    normalizer: Arc<dyn ImageNormalizer>,
    resolver: LabelResolver,
    limits: DetectionLimits,
}

impl std::fmt::Debug for DetectionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionPipeline")
            .field("target_size", &self.normalizer.target_size())
            .field("limits", &self.limits)
            .finish()
    }
}

impl DetectionPipeline {
    pub fn new(
        registry: Arc<ModelRegistry>,
        normalizer: Arc<dyn ImageNormalizer>,
        resolver: LabelResolver,
    ) -> Self {
        Self {
            registry,
            normalizer,
            resolver,
            limits: DetectionLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: DetectionLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn is_model_available(&self) -> bool {
        self.registry.is_available(ModelSlot::Disease)
    }

    /// Detects disease in one image.
    ///
    /// Returns the `Unavailable` result without decoding when the disease
    /// model is not loaded. Undecodable bytes fail with `InvalidImage`.
    pub fn detect_one(&self, bytes: &[u8]) -> Result<DetectionResult, DomainError> {
        let Some(model) = self.registry.loaded(ModelSlot::Disease) else {
            return Ok(DetectionResult::unavailable());
        };

        let start = Instant::now();

        let tensor = self.normalizer.normalize(bytes).inspect_err(|_| {
            record_detection_failure("invalid_image");
        })?;

        let scores = model
            .artifact()
            .predict(&tensor.shape(), tensor.data())
            .inspect_err(|e| {
                record_detection_failure("inference");
                error!(error = %e, "Disease model prediction failed");
            })?;

        let result = self.resolver.resolve(model.labels(), &scores);
        record_detection(result.status, start.elapsed());

        debug!(
            disease = %result.label,
            confidence = result.confidence,
            status = %result.status,
            "Disease detected"
        );

        Ok(result)
    }

    /// Lazily detects every named item in input order; empty-name items are
    /// skipped and failures are reported per item
    pub fn detect_batch<'a, I>(&'a self, items: I) -> impl Iterator<Item = BatchOutcome> + 'a
    where
        I: IntoIterator<Item = BatchItem>,
        I::IntoIter: 'a,
    {
        items
            .into_iter()
            .filter(|item| !item.is_empty_slot())
            .map(move |item| {
                let result = self.detect_one(&item.bytes);
                BatchOutcome::from_result(item.name, result)
            })
    }

    /// Runs [`Self::detect_one`] on the blocking pool under the per-item timeout
    pub async fn detect_one_blocking(
        self: Arc<Self>,
        bytes: Bytes,
    ) -> Result<DetectionResult, DomainError> {
        self.detect_with_permit(bytes, None).await
    }

    /// The permit moves into the blocking task and is released only when the
    /// forward pass returns, even if the caller already gave up on a timeout
    async fn detect_with_permit(
        self: Arc<Self>,
        bytes: Bytes,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<DetectionResult, DomainError> {
        let timeout = self.limits.item_timeout;
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            self.detect_one(&bytes)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(DomainError::internal(format!(
                "Detection task failed: {}",
                join_error
            ))),
            Err(_) => {
                record_detection_failure("timeout");
                Err(DomainError::timeout(timeout.as_millis() as u64))
            }
        }
    }

    /// Batch detection over a bounded worker pool.
    ///
    /// At most `batch_workers` forward passes run at once, counting passes
    /// that outlived `item_timeout`; each pass is awaited for at most
    /// `item_timeout`. Outcomes are written into an indexed buffer, so the
    /// returned order always equals the input order.
    pub async fn detect_batch_concurrent(self: Arc<Self>, items: Vec<BatchItem>) -> Vec<BatchOutcome> {
        let items: Vec<BatchItem> = items
            .into_iter()
            .filter(|item| !item.is_empty_slot())
            .collect();

        if !self.is_model_available() {
            return items
                .into_iter()
                .map(|item| BatchOutcome::Detected {
                    name: item.name,
                    result: DetectionResult::unavailable(),
                })
                .collect();
        }

        let names: Vec<String> = items.iter().map(|item| item.name.clone()).collect();
        let mut outcomes: Vec<Option<BatchOutcome>> = vec![None; items.len()];
        let semaphore = Arc::new(Semaphore::new(self.limits.batch_workers.max(1)));
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let pipeline = Arc::clone(&self);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(permit) => pipeline.detect_with_permit(item.bytes, Some(permit)).await,
                    Err(e) => Err(DomainError::internal(format!("Worker pool closed: {}", e))),
                };
                (index, BatchOutcome::from_result(item.name, result))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => error!(error = %e, "Batch worker terminated unexpectedly"),
            }
        }

        outcomes
            .into_iter()
            .zip(names)
            .map(|(outcome, name)| {
                outcome.unwrap_or_else(|| {
                    warn!(filename = %name, "Batch item produced no outcome");
                    BatchOutcome::Failed(ItemError::new(
                        name,
                        &DomainError::internal("Batch worker terminated unexpectedly"),
                    ))
                })
            })
            .collect()
    }
}
