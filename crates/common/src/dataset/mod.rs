//! Dataset layout and paper loading
//!
//! A dataset is a directory with one subfolder per paper:
//!
//! ```text
//! <root>/<paper-id>/title.txt
//! <root>/<paper-id>/abstract.txt
//! <root>/<paper-id>/*.bib        (optional)
//! ```
//!
//! Folders are visited in sorted name order so every run sees the papers in
//! the same sequence.

use crate::config::DatasetConfig;
use crate::errors::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A paper read from the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    /// Folder name, unique within the dataset
    pub id: String,

    /// Paper title (trimmed)
    pub title: String,

    /// Paper abstract (trimmed), absent when the folder has no abstract file
    pub abstract_text: Option<String>,

    /// First bibliography file found in the folder
    pub bibliography: Option<PathBuf>,
}

/// Build the indexed text of a paper from its title and abstract
pub fn document_text(title: &str, abstract_text: &str) -> String {
    format!("{} {}", title, abstract_text)
}

/// Every paper of one ranking run, as parallel id/text sequences
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, document: impl Into<String>) {
        self.ids.push(id.into());
        self.documents.push(document.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// File naming convention of a dataset rooted at `root`
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
    title_file: String,
    abstract_file: String,
    bibliography_extension: String,
}

impl DatasetLayout {
    /// Layout with the default file names
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(root, &DatasetConfig::default())
    }

    /// Layout with file names taken from configuration
    pub fn from_config(root: impl Into<PathBuf>, config: &DatasetConfig) -> Self {
        Self {
            root: root.into(),
            title_file: config.title_file.clone(),
            abstract_file: config.abstract_file.clone(),
            bibliography_extension: config.bibliography_extension.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paper folders under the root, sorted by name
    pub fn paper_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.root.is_dir() {
            return Err(AppError::DatasetNotFound {
                path: self.root.clone(),
            });
        }

        let entries = fs::read_dir(&self.root).map_err(|e| AppError::io(&self.root, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => dirs.push((name, path)),
                Err(name) => warn!(folder = ?name, "Skipping non-UTF-8 paper folder"),
            }
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs)
    }

    /// Load (id, title + " " + abstract) for every folder that has both files.
    ///
    /// Fails with `EmptyCorpus` when no folder qualifies.
    pub fn load_corpus(&self) -> Result<Corpus> {
        let mut corpus = Corpus::new();

        for (id, dir) in self.paper_dirs()? {
            let title_path = dir.join(&self.title_file);
            let abstract_path = dir.join(&self.abstract_file);
            if !title_path.is_file() || !abstract_path.is_file() {
                debug!(paper = %id, "Skipping folder without title and abstract");
                continue;
            }

            let title = read_text(&title_path)?;
            let abstract_text = read_text(&abstract_path)?;
            corpus.push(id, document_text(&title, &abstract_text));
        }

        if corpus.is_empty() {
            return Err(AppError::EmptyCorpus {
                path: self.root.clone(),
            });
        }

        debug!(papers = corpus.len(), root = %self.root.display(), "Corpus loaded");
        Ok(corpus)
    }

    /// Load every folder that has a title file. Abstract and bibliography
    /// are optional.
    pub fn load_titled_papers(&self) -> Result<Vec<Paper>> {
        let mut papers = Vec::new();

        for (id, dir) in self.paper_dirs()? {
            let title_path = dir.join(&self.title_file);
            if !title_path.is_file() {
                debug!(paper = %id, "Skipping folder without title");
                continue;
            }

            let title = read_text(&title_path)?;
            let abstract_path = dir.join(&self.abstract_file);
            let abstract_text = if abstract_path.is_file() {
                Some(read_text(&abstract_path)?)
            } else {
                None
            };
            let bibliography = self.find_bibliography(&dir)?;

            papers.push(Paper {
                id,
                title,
                abstract_text,
                bibliography,
            });
        }

        debug!(papers = papers.len(), root = %self.root.display(), "Papers loaded");
        Ok(papers)
    }

    /// First file (by name) with the bibliography extension
    pub fn find_bibliography(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext == self.bibliography_extension)
                    .unwrap_or(false)
            })
            .collect();

        candidates.sort();
        Ok(candidates.into_iter().next())
    }
}

/// Read a text file, trimmed. Invalid UTF-8 sequences are dropped.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AppError::io(path, e))?;
    Ok(decode_utf8_ignoring_invalid(&bytes).trim().to_string())
}

/// Decode UTF-8, skipping every invalid byte sequence
fn decode_utf8_ignoring_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                // None: truncated sequence at the end of input
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_paper(root: &Path, id: &str, title: Option<&str>, abstract_text: Option<&str>) -> PathBuf {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        if let Some(title) = title {
            fs::write(dir.join("title.txt"), title).unwrap();
        }
        if let Some(abstract_text) = abstract_text {
            fs::write(dir.join("abstract.txt"), abstract_text).unwrap();
        }
        dir
    }

    #[test]
    fn test_corpus_requires_title_and_abstract() {
        let tmp = TempDir::new().unwrap();
        write_paper(tmp.path(), "b", Some("  Second paper\n"), Some("about graphs\n"));
        write_paper(tmp.path(), "a", Some("First paper"), Some("about text"));
        write_paper(tmp.path(), "c", Some("No abstract"), None);
        fs::write(tmp.path().join("stray.txt"), "not a folder").unwrap();

        let corpus = DatasetLayout::new(tmp.path()).load_corpus().unwrap();
        assert_eq!(corpus.ids, vec!["a", "b"]);
        assert_eq!(corpus.documents[0], "First paper about text");
        assert_eq!(corpus.documents[1], "Second paper about graphs");
    }

    #[test]
    fn test_empty_corpus_fails() {
        let tmp = TempDir::new().unwrap();
        write_paper(tmp.path(), "only-title", Some("Lonely"), None);

        let err = DatasetLayout::new(tmp.path()).load_corpus().unwrap_err();
        assert!(matches!(err, AppError::EmptyCorpus { .. }));
    }

    #[test]
    fn test_missing_root_fails() {
        let tmp = TempDir::new().unwrap();
        let err = DatasetLayout::new(tmp.path().join("nope")).load_corpus().unwrap_err();
        assert!(matches!(err, AppError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_titled_papers_find_first_bibliography() {
        let tmp = TempDir::new().unwrap();
        let dir = write_paper(tmp.path(), "p1", Some("Paper One"), None);
        fs::write(dir.join("z.bib"), "@article{z}").unwrap();
        fs::write(dir.join("a.bib"), "@article{a}").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        write_paper(tmp.path(), "p2", Some("Paper Two"), Some("Abstract"));
        write_paper(tmp.path(), "p3", None, Some("No title"));

        let papers = DatasetLayout::new(tmp.path()).load_titled_papers().unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].id, "p1");
        assert_eq!(papers[0].bibliography, Some(dir.join("a.bib")));
        assert_eq!(papers[0].abstract_text, None);
        assert_eq!(papers[1].bibliography, None);
        assert_eq!(papers[1].abstract_text.as_deref(), Some("Abstract"));
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let tmp = TempDir::new().unwrap();
        let dir = write_paper(tmp.path(), "p", None, Some("abstract"));
        fs::write(dir.join("title.txt"), b"Caf\xff Title").unwrap();

        let papers = DatasetLayout::new(tmp.path()).load_titled_papers().unwrap();
        assert_eq!(papers[0].title, "Caf Title");
    }

    #[test]
    fn test_invalid_bytes_do_not_split_words() {
        assert_eq!(decode_utf8_ignoring_invalid(b"graph\xffnetworks"), "graphnetworks");
        assert_eq!(decode_utf8_ignoring_invalid(b"\xc3\xbcber \xe2\x82"), "\u{fc}ber ");
        assert_eq!(decode_utf8_ignoring_invalid("caf\u{e9}".as_bytes()), "caf\u{e9}");
        assert!(!decode_utf8_ignoring_invalid(b"a\x80\x80b").contains('\u{fffd}'));
    }
}
