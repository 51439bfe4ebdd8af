//! Strip partitioning — pure Rust, built on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `ImageReader::with_guessed_format` + `decode` |
//! | **Boundaries** | [`calculate_strip_regions`] (pure arithmetic) |
//! | **Crop → bytes** | `crop_imm` + `write_to` in the source format |
//! | **Partition** | [`partition`]: boundaries + backend + naming |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for strip boundary math (unit testable)
//! - **Parameters**: Strip width, output formats, crop rectangles
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`partition`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, SourceImage};
pub use calculations::{calculate_strip_regions, strip_count};
pub use operations::{Strip, partition};
pub use params::{CropRegion, StripFormat, StripWidth};
pub use rust_backend::RustBackend;
