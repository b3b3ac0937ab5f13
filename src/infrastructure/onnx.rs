//! ONNX artifacts executed with tract

use std::path::Path;

use tract_onnx::prelude::*;
use tracing::debug;

use crate::domain::{DomainError, InferenceArtifact};

/// An optimized ONNX graph with a fixed input shape
pub struct TractArtifact {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: Vec<usize>,
}

impl std::fmt::Debug for TractArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TractArtifact")
            .field("input_shape", &self.input_shape)
            .finish()
    }
}

impl TractArtifact {
    /// Loads and optimizes the graph at `path` for inputs of `input_shape`
    pub fn load(path: &Path, input_shape: &[usize]) -> Result<Self, DomainError> {
        debug!(path = %path.display(), ?input_shape, "Loading ONNX model");

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact(input_shape.to_vec()).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                DomainError::inference(format!(
                    "Failed to load ONNX model '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            plan,
            input_shape: input_shape.to_vec(),
        })
    }
}

impl InferenceArtifact for TractArtifact {
    fn predict(&self, shape: &[usize], data: &[f32]) -> Result<Vec<f32>, DomainError> {
        if shape != self.input_shape.as_slice() {
            return Err(DomainError::inference(format!(
                "Input shape {:?} does not match model input {:?}",
                shape, self.input_shape
            )));
        }

        let input = Tensor::from_shape(shape, data)
            .map_err(|e| DomainError::inference(format!("Failed to build input tensor: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| DomainError::inference(format!("Forward pass failed: {}", e)))?;

        let scores = outputs
            .first()
            .ok_or_else(|| DomainError::inference("Model produced no outputs"))?
            .to_array_view::<f32>()
            .map_err(|e| DomainError::inference(format!("Unexpected output type: {}", e)))?
            .iter()
            .copied()
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_is_an_error() {
        let result = TractArtifact::load(Path::new("does/not/exist.onnx"), &[1, 7]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("does/not/exist.onnx"));
    }
}
