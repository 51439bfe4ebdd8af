//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the partitioner needs:
//! decode an upload into a [`SourceImage`], and encode one [`CropRegion`] of it
//! back into bytes in the source format.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock so the partition logic can be checked
//! without paying for real encoders.

use super::params::{CropRegion, StripFormat};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode strip: {0}")]
    Encode(String),
}

/// A decoded raster plus the format it arrived in.
///
/// Only ever read and cropped; the partitioner never mutates it.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: DynamicImage,
    format: StripFormat,
}

impl SourceImage {
    pub fn new(pixels: DynamicImage, format: StripFormat) -> Self {
        Self { pixels, format }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn format(&self) -> StripFormat {
        self.format
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Trait for image backends.
///
/// `Sync` so a single backend can be shared by every request handler.
pub trait ImageBackend: Sync {
    /// Decode raw upload bytes, detecting the format from content.
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError>;

    /// Encode one region of `image` in the image's own format.
    fn encode_region(
        &self,
        image: &SourceImage,
        region: CropRegion,
    ) -> Result<Vec<u8>, BackendError>;
}
