//! Batch submission types

use bytes::Bytes;
use serde::Serialize;

use super::label::DetectionResult;
use crate::domain::error::DomainError;

/// One uploaded image in a batch submission
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub name: String,
    pub bytes: Bytes,
}

impl BatchItem {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Empty upload slots carry no file name and are skipped
    pub fn is_empty_slot(&self) -> bool {
        self.name.is_empty()
    }
}

/// Failure of a single batch item; never aborts the rest of the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemError {
    pub name: String,
    pub error: String,
}

impl ItemError {
    pub fn new(name: impl Into<String>, error: &DomainError) -> Self {
        Self {
            name: name.into(),
            error: error.to_string(),
        }
    }
}

/// Per-item result of a batch detection
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Detected { name: String, result: DetectionResult },
    Failed(ItemError),
}

impl BatchOutcome {
    pub fn from_result(name: String, result: Result<DetectionResult, DomainError>) -> Self {
        match result {
            Ok(result) => Self::Detected { name, result },
            Err(e) => Self::Failed(ItemError::new(name, &e)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Detected { name, .. } => name,
            Self::Failed(err) => &err.name,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot() {
        assert!(BatchItem::new("", Bytes::new()).is_empty_slot());
        assert!(!BatchItem::new("leaf.jpg", Bytes::new()).is_empty_slot());
    }

    #[test]
    fn test_outcome_from_error_keeps_name() {
        let outcome = BatchOutcome::from_result(
            "bad.png".to_string(),
            Err(DomainError::invalid_image("truncated")),
        );

        assert_eq!(outcome.name(), "bad.png");
        assert!(!outcome.is_detected());
        assert_eq!(
            outcome,
            BatchOutcome::Failed(ItemError {
                name: "bad.png".to_string(),
                error: "Invalid image: truncated".to_string(),
            })
        );
    }
}
