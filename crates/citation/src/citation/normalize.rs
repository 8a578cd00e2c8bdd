//! Title normalization
//!
//! The normalized title is the join key between a paper and the
//! bibliography entries that cite it. Both sides must go through
//! [`normalize_title`] or matches are silently lost.

/// Lowercase and drop every non-alphanumeric character.
///
/// Lowercasing runs first: a few characters lowercase into sequences that
/// contain combining marks, and those must be stripped too for the result
/// to be a fixed point.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
