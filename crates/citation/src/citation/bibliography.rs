//! Naive BibTeX title extraction
//!
//! Line oriented: an entry is the text between two `@` markers,
//! and only the first line of an entry that starts with `title` is read.
//! Multi-line titles, nested braces and `booktitle`-style fields beyond that
//! first line are not handled.

use paperlens_common::dataset::read_text;
use std::path::Path;
use tracing::{debug, warn};

/// Cited titles of a bibliography file, raw as found in the entries.
///
/// An unreadable file yields no titles.
pub fn parse_bibliography_file(path: &Path) -> Vec<String> {
    match read_text(path) {
        Ok(text) => {
            let titles = parse_bibliography(&text);
            debug!(path = %path.display(), titles = titles.len(), "Bibliography parsed");
            titles
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable bibliography, treating as empty");
            Vec::new()
        }
    }
}

/// Cited titles of BibTeX text
pub fn parse_bibliography(text: &str) -> Vec<String> {
    text.split('@')
        .skip(1)
        .filter_map(parse_entry_title)
        .collect()
}

/// Title of one entry, from its first line starting with `title`
fn parse_entry_title(entry: &str) -> Option<String> {
    let line = split_lines(entry).find(|line| line.trim().to_lowercase().starts_with("title"))?;

    let (_, value) = line.split_once('=')?;
    let value = value.trim().trim_end_matches(',').trim();

    let value = value
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(value);

    Some(value.to_string())
}

/// Lines split on every line boundary, including a lone `\r`, form feed,
/// and the Unicode separators
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        matches!(
            c,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
    })
}
