//! Model input tensors

use serde::Deserialize;

/// Number of colour channels every model input carries (RGB)
pub const CHANNELS: usize = 3;

/// Spatial size images are resized to before inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Number of scalar elements in a single-image NHWC tensor of this size
    pub fn element_count(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::square(128)
    }
}

/// A batch-of-one image tensor in NHWC layout with values in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    size: TargetSize,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Wraps raw NHWC data; `None` when the length does not match `size`
    pub fn new(size: TargetSize, data: Vec<f32>) -> Option<Self> {
        (data.len() == size.element_count()).then_some(Self { size, data })
    }

    /// Shape as `[1, H, W, 3]`
    pub fn shape(&self) -> [usize; 4] {
        [
            1,
            self.size.height as usize,
            self.size.width as usize,
            CHANNELS,
        ]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_is_nhwc() {
        let size = TargetSize::new(4, 2);
        let tensor = ImageTensor::new(size, vec![0.0; size.element_count()]).unwrap();
        assert_eq!(tensor.shape(), [1, 2, 4, 3]);
    }

    #[test]
    fn test_rejects_mismatched_length() {
        assert!(ImageTensor::new(TargetSize::square(2), vec![0.0; 5]).is_none());
    }

    #[test]
    fn test_default_target_size() {
        assert_eq!(TargetSize::default(), TargetSize::square(128));
    }
}
