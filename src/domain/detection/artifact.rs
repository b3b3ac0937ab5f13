//! Inference seams: trained artifacts and image normalization

use super::tensor::{ImageTensor, TargetSize};
use crate::domain::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// A deserialized trained classifier
///
/// Implementations are immutable after construction and must be safe to call
/// from many requests at once.
#[cfg_attr(test, automock)]
pub trait InferenceArtifact: Send + Sync {
    /// Runs a forward pass over a row-major tensor of the given shape and
    /// returns one score per class.
    fn predict(&self, shape: &[usize], data: &[f32]) -> Result<Vec<f32>, DomainError>;
}

/// Decodes raw upload bytes into the tensor a disease model expects
#[cfg_attr(test, automock)]
pub trait ImageNormalizer: Send + Sync {
    /// Fails with `DomainError::InvalidImage` when the bytes are not a decodable image
    fn normalize(&self, bytes: &[u8]) -> Result<ImageTensor, DomainError>;

    fn target_size(&self) -> TargetSize;
}
