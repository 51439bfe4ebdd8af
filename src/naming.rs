//! Filename rules for uploads, strips, and archives.
//!
//! Every name the service produces is derived from the client's upload
//! filename, so all of the string handling lives here:
//!
//! - **Validation**: is there a filename, and does its extension belong to the
//!   accepted set?
//! - **Sanitizing**: turn an arbitrary client filename into something safe to
//!   use as a ZIP entry or download name.
//! - **Derivation**: base names, strip filenames, folder names, and the two
//!   download names.
//!
//! ## Strip Names
//!
//! `{base}_parte{NN}.{ext}` where `NN` is the 1-based strip index padded to
//! two digits. Images wider than 99 strips get three-digit indices from 100
//! on (`_parte100`), which sorts before `_parte11` lexically. This is kept as
//! is: carousels cap out far below 99 slides.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Upload extensions accepted by the service (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Name used when sanitizing leaves nothing of the upload filename.
pub const FALLBACK_NAME: &str = "image";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file was sent")]
    Missing,
    #[error("no file was selected")]
    EmptyName,
    #[error("unsupported image format: {0}")]
    UnsupportedExtension(String),
}

/// Extension after the last dot, if there is a dot at all.
///
/// `"a.tar.gz"` → `Some("gz")`, `"README"` → `None`, `".png"` → `Some("png")`.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

/// Whether `filename` carries one of the [`ALLOWED_EXTENSIONS`].
pub fn is_allowed(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    })
}

/// Check an upload's filename, returning it when it can be processed.
pub fn validate_upload_name(filename: Option<&str>) -> Result<&str, ValidationError> {
    let name = filename.ok_or(ValidationError::Missing)?;
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !is_allowed(name) {
        return Err(ValidationError::UnsupportedExtension(
            extension(name).unwrap_or_default().to_string(),
        ));
    }
    Ok(name)
}

/// Strip the extension from a filename.
///
/// Only the final `.ext` is removed, and leading dots never start an
/// extension, so dotfiles keep their name:
///
/// - `"foo.png"` → `"foo"`
/// - `"archive.tar.gz"` → `"archive.tar"`
/// - `".hidden"` → `".hidden"`
/// - `"..png"` → `"..png"`
/// - `"noext"` → `"noext"`
pub fn base_name(filename: &str) -> &str {
    let start = filename.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let Some(dot) = filename.rfind('.').filter(|&d| d > start) else {
        return filename;
    };
    if filename[start..dot].chars().all(|c| c == '.') {
        return filename;
    }
    &filename[..dot]
}

/// Make a client filename safe for archive entries and download names.
///
/// - text is NFKD-decomposed, so accented letters keep their base letter
/// - path separators become spaces
/// - whitespace runs collapse into single underscores
/// - characters outside `[A-Za-z0-9_.-]` (including what is left of non-ASCII) are dropped
/// - leading and trailing `.` and `_` are trimmed
///
/// The result may be empty; callers fall back to [`FALLBACK_NAME`].
pub fn sanitize_filename(filename: &str) -> String {
    let decomposed: String = filename.nfkd().collect();
    let spaced = decomposed.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(['.', '_']).to_string()
}

/// Sanitize, substituting [`FALLBACK_NAME`] when nothing usable remains.
pub fn sanitize_or_fallback(filename: &str) -> String {
    let cleaned = sanitize_filename(filename);
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Filename of a strip: `{base}_parte{index:02}.{ext}`.
pub fn strip_filename(base: &str, index: u32, ext: &str) -> String {
    format!("{base}_parte{index:02}.{ext}")
}

/// Download name for a single-image archive: `{base}-splited.zip`.
///
/// Everything after the last dot is dropped, matching how the upload's
/// extension is removed for the archive's own name.
pub fn single_archive_name(sanitized: &str) -> String {
    let base = sanitized
        .rsplit_once('.')
        .map_or(sanitized, |(base, _)| base);
    format!("{base}-splited.zip")
}

/// Download name for a batch archive.
pub fn batch_archive_name(images_processed: usize, total_strips: usize) -> String {
    format!("carrosseis-splited-{images_processed}imgs-{total_strips}parts.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Extension checks
    // =========================================================================

    #[test]
    fn allowed_extensions_case_insensitive() {
        assert!(is_allowed("a.png"));
        assert!(is_allowed("a.PNG"));
        assert!(is_allowed("a.JpEg"));
        assert!(is_allowed("photo.final.webp"));
    }

    #[test]
    fn disallowed_extensions() {
        assert!(!is_allowed("notes.txt"));
        assert!(!is_allowed("png"));
        assert!(!is_allowed("image.tiff"));
        assert!(!is_allowed("trailing."));
    }

    #[test]
    fn validate_upload_name_cases() {
        assert_eq!(validate_upload_name(None), Err(ValidationError::Missing));
        assert_eq!(
            validate_upload_name(Some("")),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_upload_name(Some("x.txt")),
            Err(ValidationError::UnsupportedExtension("txt".into()))
        );
        assert_eq!(validate_upload_name(Some("x.gif")), Ok("x.gif"));
    }

    // =========================================================================
    // base_name
    // =========================================================================

    #[test]
    fn base_name_strips_last_extension() {
        assert_eq!(base_name("foo.png"), "foo");
        assert_eq!(base_name("archive.tar.gz"), "archive.tar");
        assert_eq!(base_name("noext"), "noext");
    }

    #[test]
    fn base_name_ignores_leading_dots() {
        assert_eq!(base_name(".hidden"), ".hidden");
        assert_eq!(base_name("..png"), "..png");
        assert_eq!(base_name(".config.png"), ".config");
    }

    #[test]
    fn base_name_only_looks_at_last_component() {
        assert_eq!(base_name("dir.d/file"), "dir.d/file");
        assert_eq!(base_name("dir/file.jpg"), "dir/file");
    }

    // =========================================================================
    // Sanitizing
    // =========================================================================

    #[test]
    fn sanitize_replaces_whitespace_with_underscores() {
        assert_eq!(sanitize_filename("my  photo 1.png"), "my_photo_1.png");
    }

    #[test]
    fn sanitize_neutralizes_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\pic.jpg"), "C_Users_me_pic.jpg");
    }

    #[test]
    fn sanitize_drops_non_ascii_and_symbols() {
        assert_eq!(sanitize_filename("café!.png"), "cafe.png");
        assert_eq!(sanitize_filename("a$b%c.gif"), "abc.gif");
    }

    #[test]
    fn sanitize_keeps_base_letters_of_accented_names() {
        assert_eq!(sanitize_filename("ção.png"), "cao.png");
        assert_eq!(sanitize_filename("verão 2024.jpg"), "verao_2024.jpg");
        assert_eq!(sanitize_filename("Ｆｏｔｏ.png"), "Foto.png");
    }

    #[test]
    fn sanitize_trims_dots_and_underscores() {
        assert_eq!(sanitize_filename("__init__.png"), "init__.png");
        assert_eq!(sanitize_filename("...."), "");
    }

    #[test]
    fn sanitize_or_fallback_uses_image() {
        assert_eq!(sanitize_or_fallback("日本"), "image");
        assert_eq!(sanitize_or_fallback("ok.png"), "ok.png");
    }

    // =========================================================================
    // Derived names
    // =========================================================================

    #[test]
    fn strip_filename_pads_to_two_digits() {
        assert_eq!(strip_filename("foo", 1, "png"), "foo_parte01.png");
        assert_eq!(strip_filename("foo", 10, "jpg"), "foo_parte10.jpg");
        assert_eq!(strip_filename("foo", 100, "jpg"), "foo_parte100.jpg");
    }

    #[test]
    fn single_archive_name_drops_extension() {
        assert_eq!(single_archive_name("beach.jpeg"), "beach-splited.zip");
        assert_eq!(single_archive_name("a.b.png"), "a.b-splited.zip");
        assert_eq!(single_archive_name("image"), "image-splited.zip");
    }

    #[test]
    fn batch_archive_name_includes_counters() {
        assert_eq!(
            batch_archive_name(3, 7),
            "carrosseis-splited-3imgs-7parts.zip"
        );
    }
}
