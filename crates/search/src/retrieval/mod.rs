//! Similarity retrieval
//!
//! Ranks the papers of a corpus against a query paper:
//! - Text vectorization (TF-IDF over title + abstract)
//! - Cosine similarity between sparse vectors
//! - Stable top-K selection

mod ranker;
mod tfidf;
mod vector;

pub use ranker::SimilarityRanker;
pub use tfidf::TfidfVectorizer;
pub use vector::SparseVector;

use paperlens_common::errors::Result;
use serde::{Deserialize, Serialize};

/// Paper with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPaper {
    /// Paper ID (dataset folder name)
    pub paper_id: String,

    /// Cosine similarity to the query (0.0 - 1.0)
    pub score: f32,
}

/// Trait for text vectorizers
pub trait TextVectorizer: Send + Sync {
    /// Learn the vocabulary and term weights from a corpus
    fn fit(&mut self, corpus: &[String]) -> Result<()>;

    /// Map a text into the fitted vector space
    fn transform(&self, text: &str) -> Result<SparseVector>;

    /// Similarity between two vectors of the fitted space
    fn similarity(&self, a: &SparseVector, b: &SparseVector) -> Result<f32>;

    /// Number of terms in the fitted vocabulary (0 before fit)
    fn vocabulary_size(&self) -> usize;
}
