//! # Carousel Splitter
//!
//! Cuts wide images into fixed-width vertical strips, one per carousel slide,
//! and packs them into a ZIP archive. The strips laid side by side reproduce
//! the source image exactly, so a panorama posted as a carousel swipes as one
//! continuous picture.
//!
//! # Pipeline
//!
//! ```text
//! upload bytes ─▶ decode ─▶ strip boundaries ─▶ crop + re-encode ─▶ ZIP
//!                 (imaging)  (imaging::calculations)  (imaging)     (archive)
//! ```
//!
//! Every step is synchronous and pure apart from the image backend, so the
//! same core serves both the HTTP service and the CLI.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, strip geometry, crop and re-encode in the source format |
//! | [`naming`] | Upload validation, filename sanitizing, strip and archive names |
//! | [`archive`] | Single and batch ZIP assembly, per-file skip reporting |
//! | [`server`] | axum routes: upload form, `/split`, `/split-batch`, `/healthz` |
//! | [`page`] | The upload form, rendered with Maud |
//! | [`config`] | `config.toml` loading, merging onto stock defaults, validation |
//! | [`output`] | CLI output formatting for the split commands |
//!
//! # Design Decisions
//!
//! ## Strips Keep the Source Format
//!
//! A PNG upload yields PNG strips and a JPEG upload yields JPEG strips. Only the
//! pixel layout is converted when an encoder cannot take the decoded colour
//! type (JPEG has no alpha channel, for instance).
//!
//! ## Archives Are Built in Memory
//!
//! Uploads are already bounded by `limits.max_upload_bytes`, so the archive is
//! written into a `Vec<u8>` and handed to the response whole. Nothing touches
//! the filesystem and there is no temporary file to clean up.
//!
//! ## A Bad File Never Sinks a Batch
//!
//! Batch mode reports undecodable or misnamed files and carries on; it only
//! fails when not a single image could be split.

pub mod archive;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod page;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
