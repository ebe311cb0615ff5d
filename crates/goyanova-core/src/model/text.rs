// ── Free-text folding ──
//
// Backend rows were typed by hand at some point, so day and mode tags
// arrive as "Miércoles", "MIERCOLES", " miercoles ". Everything is folded
// to one lookup key before it is matched against a closed set.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Fold raw text into a lookup key: trimmed, NFD-decomposed with combining
/// marks dropped, lowercased.
pub(crate) fn fold_key(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Like [`fold_key`], with `-` and inner whitespace collapsed to `_`.
pub(crate) fn fold_tag(raw: &str) -> String {
    fold_key(raw)
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
