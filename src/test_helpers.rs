//! Shared test utilities for the carousel-splitter test suite.
//!
//! Provides synthetic images (so tests never depend on fixture files) and ZIP
//! inspection helpers that return entries in archive order.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = encode_as(&gradient_image(2200, 4), ImageFormat::Png);
//! let result = split_single(&Upload::new("foo.png", png), StripWidth::default()).unwrap();
//!
//! let entries = read_zip_entries(&result.bytes);
//! assert_eq!(entries[0].0, "foo_parte01.png");
//! ```

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::{Cursor, Read};

// =========================================================================
// Synthetic images
// =========================================================================

/// An RGB image whose every pixel is distinct within a 256×256 window.
///
/// Pixel `(x, y)` is `(x mod 256, y mod 256, (x + y) mod 256)`, so a strip
/// placed at the wrong offset is caught by a pixel comparison.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

/// Encode an image into `format`, converting to RGBA first where the encoder
/// requires it.
pub fn encode_as(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let encodable = match format {
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img.clone(),
    };
    let mut buffer = Cursor::new(Vec::new());
    encodable.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

// =========================================================================
// ZIP inspection
// =========================================================================

/// All `(name, contents)` pairs of a ZIP archive, in archive order.
pub fn read_zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), data)
        })
        .collect()
}
