//! Citation graph construction
//!
//! Joins parsed bibliography titles against the dataset's own titles. Every
//! paper with a title is a node; an edge citing -> cited is added when a
//! bibliography title normalizes to a known paper's normalized title.

use super::bibliography::parse_bibliography_file;
use super::engine::{GraphEngine, PetGraphEngine};
use super::normalize::normalize_title;
use paperlens_common::dataset::Paper;
use std::collections::HashMap;
use tracing::{debug, info};

/// Normalized title -> paper id
#[derive(Debug, Default)]
pub struct TitleIndex {
    by_title: HashMap<String, String>,
}

impl TitleIndex {
    /// Index papers by normalized title.
    ///
    /// Titles that normalize to nothing are not indexed. On duplicates the
    /// first paper keeps the title.
    pub fn build(papers: &[Paper]) -> Self {
        let mut by_title = HashMap::with_capacity(papers.len());

        for paper in papers {
            let key = normalize_title(&paper.title);
            if key.is_empty() {
                debug!(paper = %paper.id, "Title normalizes to nothing, not indexed");
                continue;
            }
            if let Some(existing) = by_title.get(&key) {
                debug!(paper = %paper.id, kept = %existing, "Duplicate normalized title");
                continue;
            }
            by_title.insert(key, paper.id.clone());
        }

        Self { by_title }
    }

    /// Paper id whose title matches `raw_title` after normalization
    pub fn lookup(&self, raw_title: &str) -> Option<&str> {
        self.by_title
            .get(&normalize_title(raw_title))
            .map(String::as_str)
    }

    /// Number of indexed titles
    pub fn len(&self) -> usize {
        self.by_title.len()
    }
}

/// Directed citation graph over paper ids
pub struct CitationGraph<E: GraphEngine = PetGraphEngine> {
    engine: E,
    parsed_citations: usize,
    matched_citations: usize,
}

impl CitationGraph<PetGraphEngine> {
    /// Build from papers, reading each paper's bibliography file
    pub fn from_papers(papers: &[Paper]) -> Self {
        Self::build(PetGraphEngine::new(), papers, |paper| {
            paper
                .bibliography
                .as_deref()
                .map(parse_bibliography_file)
                .unwrap_or_default()
        })
    }
}

impl<E: GraphEngine> CitationGraph<E> {
    /// Build on `engine`, taking each paper's cited titles from `cited_titles`
    pub fn build<F>(mut engine: E, papers: &[Paper], mut cited_titles: F) -> Self
    where
        F: FnMut(&Paper) -> Vec<String>,
    {
        info!(papers = papers.len(), "Indexing paper titles");
        let index = TitleIndex::build(papers);
        debug!(titles = index.len(), "Title index built");
        for paper in papers {
            engine.add_node(&paper.id);
        }

        info!("Parsing bibliographies and adding edges");
        let mut parsed_citations = 0;
        let mut matched_citations = 0;
        for paper in papers {
            for title in cited_titles(paper) {
                parsed_citations += 1;
                if let Some(cited) = index.lookup(&title) {
                    matched_citations += 1;
                    engine.add_edge(&paper.id, cited);
                }
            }
        }

        info!(
            nodes = engine.node_count(),
            edges = engine.edge_count(),
            parsed_citations,
            matched_citations,
            "Citation graph built"
        );

        Self {
            engine,
            parsed_citations,
            matched_citations,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Bibliography titles seen while building
    #[cfg(test)]
    pub fn parsed_citations(&self) -> usize {
        self.parsed_citations
    }

    /// Bibliography titles that matched a dataset paper
    #[cfg(test)]
    pub fn matched_citations(&self) -> usize {
        self.matched_citations
    }
}
