//! Image decoding and resizing into model input tensors

use image::imageops::{self, FilterType};

use crate::config::ResizeFilter;
use crate::domain::{DomainError, ImageNormalizer, ImageTensor, TargetSize};

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Decodes any supported image, converts it to RGB and stretches it to the
/// target size; pixel values are scaled by 1/255
#[derive(Debug, Clone)]
pub struct ResizeNormalizer {
    size: TargetSize,
    filter: FilterType,
}

impl ResizeNormalizer {
    pub fn new(size: TargetSize, filter: ResizeFilter) -> Result<Self, DomainError> {
        if size.width == 0 || size.height == 0 {
            return Err(DomainError::configuration(format!(
                "Target size must be non-zero, got {}x{}",
                size.width, size.height
            )));
        }

        Ok(Self {
            size,
            filter: filter.into(),
        })
    }
}

impl ImageNormalizer for ResizeNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<ImageTensor, DomainError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DomainError::invalid_image(e.to_string()))?;

        let resized = imageops::resize(
            &decoded.to_rgb8(),
            self.size.width,
            self.size.height,
            self.filter,
        );

        let data = resized
            .into_raw()
            .into_iter()
            .map(|value| f32::from(value) / 255.0)
            .collect();

        ImageTensor::new(self.size, data)
            .ok_or_else(|| DomainError::internal("Resized image has unexpected length"))
    }

    fn target_size(&self) -> TargetSize {
        self.size
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    /// PNG bytes of a solid-colour RGB image
    pub fn png(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(colour))),
            ImageFormat::Png,
        )
    }

    /// PNG bytes of a solid-colour RGBA image
    pub fn rgba_png(width: u32, height: u32, colour: [u8; 4]) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(colour))),
            ImageFormat::Png,
        )
    }

    pub fn jpeg(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
        encode(
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(colour))),
            ImageFormat::Jpeg,
        )
    }

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }
}
