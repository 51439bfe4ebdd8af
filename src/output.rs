//! CLI output formatting for the split commands.
//!
//! # Output Format
//!
//! ## split
//!
//! ```text
//! foo.png → foo-splited.zip (3 strips)
//!     001 foo_parte01.png
//!     002 foo_parte02.png
//!     003 foo_parte03.png
//! ```
//!
//! ## split-batch
//!
//! ```text
//! 001 foo/ (3 strips)
//!     001 foo_parte01.png
//!     002 foo_parte02.png
//!     003 foo_parte03.png
//! 002 bar/ (1 strip)
//!     001 bar_parte01.jpg
//!
//! Skipped
//!     notes.txt: unsupported image format: txt
//!
//! Wrote 2 images, 4 strips → carrosseis-splited-2imgs-4parts.zip
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::archive::{BatchArchive, SingleArchive, SkippedFile};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn strips_label(n: usize) -> String {
    match n {
        1 => "1 strip".to_string(),
        n => format!("{n} strips"),
    }
}

/// One indented line per strip entry.
fn strip_lines(names: &[String]) -> impl Iterator<Item = String> + '_ {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("    {} {}", format_index(i + 1), name))
}

fn skipped_lines(skipped: &[SkippedFile]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    lines.extend(
        skipped
            .iter()
            .map(|file| format!("    {}: {}", file.filename, file.reason)),
    );
    lines
}

// ============================================================================
// split
// ============================================================================

/// Format the result of splitting one image into `output_path`.
pub fn format_single_output(source: &str, archive: &SingleArchive, output_path: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {} ({})",
        source,
        output_path,
        strips_label(archive.strip_count())
    )];
    lines.extend(strip_lines(&archive.strip_names));
    lines
}

pub fn print_single_output(source: &str, archive: &SingleArchive, output_path: &str) {
    for line in format_single_output(source, archive, output_path) {
        println!("{}", line);
    }
}

// ============================================================================
// split-batch
// ============================================================================

/// Format a batch result: one folder block per image, then skipped files,
/// then a summary line.
pub fn format_batch_output(archive: &BatchArchive, output_path: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, (folder, names)) in archive.folders.iter().enumerate() {
        lines.push(format!(
            "{} {}/ ({})",
            format_index(i + 1),
            folder,
            strips_label(names.len())
        ));
        lines.extend(strip_lines(names));
    }

    lines.extend(skipped_lines(&archive.skipped));

    lines.push(String::new());
    lines.push(format!(
        "Wrote {} images, {} \u{2192} {}",
        archive.images_processed,
        strips_label(archive.total_strips),
        output_path
    ));
    lines
}

pub fn print_batch_output(archive: &BatchArchive, output_path: &str) {
    for line in format_batch_output(archive, output_path) {
        println!("{}", line);
    }
}
