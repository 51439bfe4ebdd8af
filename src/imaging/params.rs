//! Parameter types for strip operations.
//!
//! These types describe *what* to cut and *how to name/encode* it, not how the
//! pixels are moved. They are the interface between the partition logic in
//! [`operations`](super::operations) and the [`backend`](super::backend) that
//! does the actual decode and encode work.
//!
//! ## Types
//!
//! - [`StripWidth`] — Width of one carousel strip in pixels (non-zero, default 1080).
//! - [`StripFormat`] — The closed set of encodings a strip can be written in.
//! - [`CropRegion`] — Half-open pixel rectangle handed to the backend for encoding.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Width of a single strip in pixels.
///
/// Zero is unrepresentable: a zero-width strip would make the strip count
/// undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct StripWidth(NonZeroU32);

impl StripWidth {
    /// The carousel width used by Instagram-style posts.
    pub const DEFAULT: u32 = 1080;

    const DEFAULT_WIDTH: NonZeroU32 = match NonZeroU32::new(Self::DEFAULT) {
        Some(width) => width,
        None => panic!("default strip width must be non-zero"),
    };

    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn value(self) -> u32 {
        self.0.get()
    }
}

impl Default for StripWidth {
    fn default() -> Self {
        Self(Self::DEFAULT_WIDTH)
    }
}

impl TryFrom<u32> for StripWidth {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "strip width must be greater than zero".to_string())
    }
}

impl From<StripWidth> for u32 {
    fn from(width: StripWidth) -> Self {
        width.value()
    }
}

impl fmt::Display for StripWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.value())
    }
}

/// Encoding of a source image, and therefore of every strip cut from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
}

impl StripFormat {
    /// Map the decoder's detected format onto a strip format.
    ///
    /// Anything the decoder could not name, or named outside the supported
    /// set, is written back as PNG.
    pub fn from_detected(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Jpeg) => Self::Jpeg,
            Some(ImageFormat::Gif) => Self::Gif,
            Some(ImageFormat::Bmp) => Self::Bmp,
            Some(ImageFormat::WebP) => Self::WebP,
            _ => Self::Png,
        }
    }

    /// Lowercase extension used in strip filenames.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::WebP => "webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for StripFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
            Self::WebP => "WEBP",
        })
    }
}

/// A half-open pixel rectangle `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_width_rejects_zero() {
        assert!(StripWidth::new(0).is_none());
        assert_eq!(StripWidth::new(1).map(StripWidth::value), Some(1));
    }

    #[test]
    fn strip_width_default_is_1080() {
        assert_eq!(StripWidth::default().value(), 1080);
    }

    #[test]
    fn strip_width_deserializes_from_integer() {
        #[derive(Deserialize)]
        struct Wrapper {
            width: StripWidth,
        }
        let ok: Wrapper = toml::from_str("width = 540").unwrap();
        assert_eq!(ok.width.value(), 540);
        assert!(toml::from_str::<Wrapper>("width = 0").is_err());
    }

    #[test]
    fn undetected_format_falls_back_to_png() {
        assert_eq!(StripFormat::from_detected(None), StripFormat::Png);
        assert_eq!(
            StripFormat::from_detected(Some(ImageFormat::Tiff)),
            StripFormat::Png
        );
    }

    #[test]
    fn detected_formats_keep_their_encoding() {
        assert_eq!(
            StripFormat::from_detected(Some(ImageFormat::Jpeg)),
            StripFormat::Jpeg
        );
        assert_eq!(
            StripFormat::from_detected(Some(ImageFormat::WebP)),
            StripFormat::WebP
        );
        assert_eq!(
            StripFormat::from_detected(Some(ImageFormat::Gif)),
            StripFormat::Gif
        );
        assert_eq!(
            StripFormat::from_detected(Some(ImageFormat::Bmp)),
            StripFormat::Bmp
        );
    }

    #[test]
    fn extensions_are_lowercase() {
        assert_eq!(StripFormat::Png.extension(), "png");
        assert_eq!(StripFormat::Jpeg.extension(), "jpg");
        assert_eq!(StripFormat::WebP.extension(), "webp");
    }

    #[test]
    fn crop_region_right_edge_is_exclusive() {
        let region = CropRegion {
            x: 1080,
            y: 0,
            width: 40,
            height: 500,
        };
        assert_eq!(region.right(), 1120);
    }
}
