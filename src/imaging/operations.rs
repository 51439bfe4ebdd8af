//! High-level strip operations.
//!
//! These functions combine the boundary calculations with backend execution:
//! compute the crop regions, hand each to the backend for encoding, and name
//! the results.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::calculations::calculate_strip_regions;
use super::params::{StripFormat, StripWidth};
use crate::naming::{base_name, strip_filename};
use tracing::debug;

/// Result type for strip operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// One vertical slice of a source image, ready to be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    /// 1-based position, left to right.
    pub index: u32,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: StripFormat,
}

/// Slice `image` into strips of `strip_width` pixels.
///
/// `base_filename` is the (already sanitized) upload filename; its extension is
/// dropped and replaced with the extension of the image's own format, so
/// `foo.jpeg` decoded as JPEG produces `foo_parte01.jpg`.
///
/// Strips are returned in left-to-right order with contiguous indices from 1.
pub fn partition(
    backend: &impl ImageBackend,
    image: &SourceImage,
    base_filename: &str,
    strip_width: StripWidth,
) -> Result<Vec<Strip>> {
    let stem = base_name(base_filename);
    let format = image.format();
    let regions = calculate_strip_regions(image.dimensions(), strip_width);

    regions
        .into_iter()
        .zip(1u32..)
        .map(|(region, index)| {
            let bytes = backend.encode_region(image, region)?;
            let filename = strip_filename(stem, index, format.extension());
            debug!(
                strip = %filename,
                x = region.x,
                width = region.width,
                bytes = bytes.len(),
                "encoded strip"
            );
            Ok(Strip {
                index,
                filename,
                bytes,
                format,
            })
        })
        .collect()
}
