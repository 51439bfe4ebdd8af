//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `ImageReader::with_guessed_format` (magic bytes, not extension) |
//! | Decode (PNG, JPEG, GIF, BMP, WebP) | `image` crate decoders |
//! | Crop | `DynamicImage::crop_imm` (copy, source untouched) |
//! | Encode | `DynamicImage::write_to` with the source [`ImageFormat`] at encoder defaults |
//!
//! Encoders accept fewer colour types than decoders produce (JPEG has no alpha,
//! GIF only takes RGBA). [`encodable_for`] converts a crop to the closest type
//! its encoder accepts; PNG is written with the decoded colour type unchanged.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::params::{CropRegion, StripFormat};
use image::{ColorType, DynamicImage, ImageReader};
use std::io::Cursor;

/// Backend using the `image` crate's built-in codecs.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a crop to a colour type the target encoder accepts.
fn encodable_for(img: DynamicImage, format: StripFormat) -> DynamicImage {
    match format {
        StripFormat::Png => img,
        StripFormat::Jpeg => match img.color() {
            ColorType::L8 | ColorType::Rgb8 => img,
            ColorType::L16 | ColorType::La8 | ColorType::La16 => {
                DynamicImage::ImageLuma8(img.into_luma8())
            }
            _ => DynamicImage::ImageRgb8(img.into_rgb8()),
        },
        StripFormat::Gif => match img.color() {
            ColorType::Rgba8 => img,
            _ => DynamicImage::ImageRgba8(img.into_rgba8()),
        },
        StripFormat::Bmp | StripFormat::WebP => match img.color() {
            ColorType::Rgb8 | ColorType::Rgba8 => img,
            c if c.has_alpha() => DynamicImage::ImageRgba8(img.into_rgba8()),
            _ => DynamicImage::ImageRgb8(img.into_rgb8()),
        },
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<SourceImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let format = StripFormat::from_detected(reader.format());
        let pixels = reader
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(SourceImage::new(pixels, format))
    }

    fn encode_region(
        &self,
        image: &SourceImage,
        region: CropRegion,
    ) -> Result<Vec<u8>, BackendError> {
        let format = image.format();
        let cropped = image
            .pixels()
            .crop_imm(region.x, region.y, region.width, region.height);
        let encodable = encodable_for(cropped, format);

        let mut buffer = Cursor::new(Vec::new());
        encodable
            .write_to(&mut buffer, format.image_format())
            .map_err(|e| BackendError::Encode(format!("{format} at x={}: {e}", region.x)))?;
        Ok(buffer.into_inner())
    }
}
