//! Filename sanitization and title prettification.
//!
//! Uploaded filenames serve two purposes: they become stable identifiers
//! for the backend (sanitized form) and the seed for a human-readable
//! index title (prettified form). The two transformations are deliberately
//! different: the sanitizer is ASCII-conservative so the result is safe in
//! any filesystem or form field, while the prettifier preserves
//! international text and punctuation for display.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_OR_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.-]").unwrap());

static UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

// Keep letters, numbers, punctuation, symbols and separators; drop
// control/format characters and anything unprintable.
static NON_DISPLAY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\p{P}\p{S}\p{Z}]").unwrap());

/// Normalize a filename into a filename-safe identifier.
///
/// Runs of whitespace or underscores collapse to a single hyphen, then
/// every character outside `{letters, digits, hyphen, period}` is removed.
/// The function is idempotent but makes no uniqueness guarantee; collision
/// handling is the ingestion layer's responsibility.
///
/// # Examples
///
/// ```
/// use bunidx::naming::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Witness Statement (final).pdf"),
///            "Witness-Statement-final.pdf");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let hyphenated = WHITESPACE_OR_UNDERSCORE.replace_all(name, "-");
    UNSAFE_FILENAME_CHARS.replace_all(&hyphenated, "").into_owned()
}

/// Derive a display-ready title from a raw title or filename stem.
///
/// Underscore runs become single spaces, characters outside the Unicode
/// general categories L/N/P/S/Z are dropped, and the result is trimmed.
/// Used both when first deriving a title from a filename and when
/// normalizing a user-edited title before serialization.
pub fn prettify_title(raw: &str) -> String {
    let spaced = UNDERSCORE_RUN.replace_all(raw, " ");
    NON_DISPLAY_CHARS.replace_all(&spaced, "").trim().to_string()
}

/// Strip a trailing `.pdf` extension (case-insensitive), if present.
///
/// Titles are derived from the stem, not the full filename.
pub fn strip_pdf_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        &name[..name.len() - 4]
    } else {
        name
    }
}
