use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Model load error: {slot} - {message}")]
    ModelLoad { slot: String, message: String },

    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    #[error("Model not loaded: {slot}")]
    NotLoaded { slot: String },

    #[error("Inference error: {message}")]
    Inference { message: String },

    #[error("Timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn model_load(slot: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            slot: slot.into(),
            message: message.into(),
        }
    }

    pub fn invalid_image(message: impl Into<String>) -> Self {
        Self::InvalidImage {
            message: message.into(),
        }
    }

    pub fn not_loaded(slot: impl Into<String>) -> Self {
        Self::NotLoaded { slot: slot.into() }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn timeout(millis: u64) -> Self {
        Self::Timeout { millis }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_image_error() {
        let error = DomainError::invalid_image("unsupported format");
        assert_eq!(error.to_string(), "Invalid image: unsupported format");
    }

    #[test]
    fn test_model_load_error() {
        let error = DomainError::model_load("disease", "file not found");
        assert_eq!(
            error.to_string(),
            "Model load error: disease - file not found"
        );
    }

    #[test]
    fn test_not_loaded_error() {
        let error = DomainError::not_loaded("crop");
        assert_eq!(error.to_string(), "Model not loaded: crop");
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout(250);
        assert_eq!(error.to_string(), "Timed out after 250 ms");
    }
}
