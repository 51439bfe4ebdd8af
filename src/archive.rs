//! ZIP assembly for single uploads and batches.
//!
//! Both modes share one writer discipline ([`ArchiveWriter`]): entries are
//! DEFLATE-compressed, written in strip order into an in-memory buffer, and
//! the buffer is only handed out after the central directory has been written.
//! A failure before that point drops the buffer, so callers never see a
//! truncated archive.
//!
//! ## Layouts
//!
//! ```text
//! single                        batch
//! ├── foo_parte01.png           ├── foo/
//! ├── foo_parte02.png           │   ├── foo_parte01.png
//! └── foo_parte03.png           │   └── foo_parte02.png
//!                               └── bar/
//!                                   └── bar_parte01.jpg
//! ```
//!
//! ## Batch Failure Policy
//!
//! A batch is a fold over its uploads where each file either yields a
//! [`BatchEntry`] or a [`SkippedFile`]. A bad file never aborts the batch; the
//! batch as a whole fails only when *nothing* could be processed.
//!
//! Folder names are unique within one archive. Two uploads that reduce to the
//! same folder (the same photo picked twice, or `a b.png` next to `a_b.png`)
//! get `-2`, `-3`, ... suffixes in upload order.

use crate::imaging::{BackendError, ImageBackend, RustBackend, Strip, StripWidth, partition};
use crate::naming::{
    ValidationError, base_name, sanitize_or_fallback, single_archive_name, validate_upload_name,
};
use std::collections::HashSet;
use std::fmt;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid upload: {0}")]
    Validation(#[from] ValidationError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("None of the {0} uploaded images could be processed")]
    NothingProcessed(usize),
}

/// A file part received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Client-supplied filename. `None` or empty means no file was chosen.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            bytes,
        }
    }

    /// Filename for logs and reports.
    pub fn display_name(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "<unnamed>",
        }
    }
}

/// Strips of one source image, grouped under a folder in a batch archive.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub folder_name: String,
    pub strips: Vec<Strip>,
}

/// Why a batch file produced no strips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Invalid(ValidationError),
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "{e}"),
            Self::Failed(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: SkipReason,
}

/// Outcome of one file in the batch fold.
#[derive(Debug)]
pub enum FileOutcome {
    Processed(BatchEntry),
    Skipped(SkippedFile),
}

/// Finished single-image archive.
#[derive(Debug)]
pub struct SingleArchive {
    pub bytes: Vec<u8>,
    /// Entry names in archive order.
    pub strip_names: Vec<String>,
    pub download_name: String,
}

impl SingleArchive {
    pub fn strip_count(&self) -> usize {
        self.strip_names.len()
    }
}

/// Finished batch archive with its counters.
#[derive(Debug)]
pub struct BatchArchive {
    pub bytes: Vec<u8>,
    pub images_processed: usize,
    pub total_strips: usize,
    /// Folders in archive order, each with its strip entry names.
    pub folders: Vec<(String, Vec<String>)>,
    pub skipped: Vec<SkippedFile>,
}

// ============================================================================
// Writer
// ============================================================================

/// In-memory ZIP writer with DEFLATE entries.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write one entry. `path` uses `/` separators.
    pub fn add(&mut self, path: &str, bytes: &[u8]) -> Result<(), ArchiveError> {
        self.zip.start_file(path, self.options)?;
        self.zip.write_all(bytes)?;
        Ok(())
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.zip.finish()?.into_inner())
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Single mode
// ============================================================================

/// Pack strips as flat entries, in order.
pub fn assemble_single(strips: &[Strip]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ArchiveWriter::new();
    for strip in strips {
        writer.add(&strip.filename, &strip.bytes)?;
    }
    writer.finish()
}

/// Validate, decode, partition, and archive one upload.
pub fn split_single(upload: &Upload, strip_width: StripWidth) -> Result<SingleArchive, ArchiveError> {
    split_single_with_backend(&RustBackend::new(), upload, strip_width)
}

/// [`split_single`] with an explicit backend (allows testing with mock).
pub fn split_single_with_backend(
    backend: &impl ImageBackend,
    upload: &Upload,
    strip_width: StripWidth,
) -> Result<SingleArchive, ArchiveError> {
    let name = validate_upload_name(upload.filename.as_deref())?;
    let safe_name = sanitize_or_fallback(name);

    let image = backend.decode(&upload.bytes)?;
    let strips = partition(backend, &image, &safe_name, strip_width)?;
    let bytes = assemble_single(&strips)?;

    info!(
        file = name,
        width = image.width(),
        height = image.height(),
        strips = strips.len(),
        "split single image"
    );

    Ok(SingleArchive {
        bytes,
        strip_names: strips.into_iter().map(|s| s.filename).collect(),
        download_name: single_archive_name(&safe_name),
    })
}

// ============================================================================
// Batch mode
// ============================================================================

/// Turn one upload into strips, or a reason it was skipped.
pub fn process_upload(
    backend: &impl ImageBackend,
    upload: &Upload,
    strip_width: StripWidth,
) -> FileOutcome {
    let skip = |reason: SkipReason| {
        FileOutcome::Skipped(SkippedFile {
            filename: upload.display_name().to_string(),
            reason,
        })
    };

    let name = match validate_upload_name(upload.filename.as_deref()) {
        Ok(name) => name,
        Err(e) => return skip(SkipReason::Invalid(e)),
    };
    let safe_name = sanitize_or_fallback(name);
    let folder_name = base_name(&safe_name).to_string();

    let strips = backend
        .decode(&upload.bytes)
        .and_then(|image| partition(backend, &image, &safe_name, strip_width));

    match strips {
        Ok(strips) => FileOutcome::Processed(BatchEntry {
            folder_name,
            strips,
        }),
        Err(e) => skip(SkipReason::Failed(e.to_string())),
    }
}

/// Reserve `base` as a folder name, or the first free `base-N` from 2 up.
fn claim_folder_name(base: &str, used: &mut HashSet<String>) -> String {
    let name = if used.contains(base) {
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| !used.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    } else {
        base.to_string()
    };
    used.insert(name.clone());
    name
}

/// Pack every processable upload into per-image folders.
///
/// Fails with [`ArchiveError::NothingProcessed`] when no upload yields strips;
/// otherwise returns the archive together with accurate counters, however many
/// files were skipped.
pub fn assemble_batch(
    uploads: &[Upload],
    strip_width: StripWidth,
) -> Result<BatchArchive, ArchiveError> {
    assemble_batch_with_backend(&RustBackend::new(), uploads, strip_width)
}

/// [`assemble_batch`] with an explicit backend (allows testing with mock).
pub fn assemble_batch_with_backend(
    backend: &impl ImageBackend,
    uploads: &[Upload],
    strip_width: StripWidth,
) -> Result<BatchArchive, ArchiveError> {
    let mut writer = ArchiveWriter::new();
    let mut folders = Vec::new();
    let mut used_folders = HashSet::new();
    let mut skipped = Vec::new();
    let mut total_strips = 0;

    for upload in uploads {
        match process_upload(backend, upload, strip_width) {
            FileOutcome::Processed(entry) => {
                let folder = claim_folder_name(&entry.folder_name, &mut used_folders);
                let mut names = Vec::with_capacity(entry.strips.len());
                for strip in &entry.strips {
                    writer.add(&format!("{}/{}", folder, strip.filename), &strip.bytes)?;
                    names.push(strip.filename.clone());
                }
                total_strips += names.len();
                folders.push((folder, names));
            }
            FileOutcome::Skipped(file) => {
                warn!(file = %file.filename, reason = %file.reason, "skipping batch file");
                skipped.push(file);
            }
        }
    }

    if folders.is_empty() {
        return Err(ArchiveError::NothingProcessed(uploads.len()));
    }

    let bytes = writer.finish()?;
    info!(
        images = folders.len(),
        strips = total_strips,
        skipped = skipped.len(),
        "assembled batch archive"
    );

    Ok(BatchArchive {
        bytes,
        images_processed: folders.len(),
        total_strips,
        folders,
        skipped,
    })
}
