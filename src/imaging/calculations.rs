//! Pure calculation functions for strip boundaries.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{CropRegion, StripWidth};

/// Number of strips needed to cover `width` pixels.
///
/// An image no wider than one strip yields exactly one strip.
///
/// # Examples
/// ```
/// # use carousel_splitter::imaging::{StripWidth, strip_count};
/// let p = StripWidth::default();
/// assert_eq!(strip_count(2200, p), 3);
/// assert_eq!(strip_count(1080, p), 1);
/// assert_eq!(strip_count(500, p), 1);
/// ```
pub fn strip_count(width: u32, strip_width: StripWidth) -> u32 {
    width.div_ceil(strip_width.value()).max(1)
}

/// Calculate the crop rectangle of every strip, left to right.
///
/// Strip `i` covers `[i * P, min((i + 1) * P, W)) × [0, H)`. The last strip is
/// narrower when `W` is not a multiple of `P`; it is never zero-width.
///
/// # Arguments
/// * `dims` - Source image dimensions (width, height)
/// * `strip_width` - Width of each strip
pub fn calculate_strip_regions(dims: (u32, u32), strip_width: StripWidth) -> Vec<CropRegion> {
    let (width, height) = dims;
    let p = strip_width.value();

    (0..strip_count(width, strip_width))
        .map(|i| {
            let left = i * p;
            let right = left.saturating_add(p).min(width);
            CropRegion {
                x: left,
                y: 0,
                width: right - left,
                height,
            }
        })
        .collect()
}
