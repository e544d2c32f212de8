//! Text run normalization.

/// Collapse every run of ASCII whitespace (space, tab, CR, LF, FF) to a single
/// space and trim both ends.
///
/// Newlines disappear entirely into the collapsed runs, so the result is
/// always a single line. Returns an empty string for whitespace-only input.
///
/// # Example
/// ```
/// use sift_common::text::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("\n  Some \t\n Text  "), "Some Text");
/// assert_eq!(normalize_whitespace(" \n\t "), "");
/// ```
#[must_use]
pub fn normalize_whitespace(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for word in raw.split_ascii_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(word);
    }
    normalized
}
