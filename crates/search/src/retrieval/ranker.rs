//! Top-K similarity ranking over a corpus

use super::{RankedPaper, TextVectorizer};
use paperlens_common::dataset::{document_text, Corpus};
use paperlens_common::errors::Result;
use tracing::{debug, warn};

/// Ranks corpus papers by similarity to a query paper
pub struct SimilarityRanker<V: TextVectorizer> {
    vectorizer: V,
    top_k: usize,
}

impl<V: TextVectorizer> SimilarityRanker<V> {
    /// Create a ranker returning at most `top_k` papers
    pub fn new(vectorizer: V, top_k: usize) -> Self {
        Self { vectorizer, top_k }
    }

    /// Fit on the corpus and rank it against `title + " " + abstract`.
    ///
    /// Returns min(top_k, corpus size) papers, most similar first. Equal
    /// scores keep corpus order.
    pub fn rank(
        &mut self,
        corpus: &Corpus,
        title: &str,
        abstract_text: &str,
    ) -> Result<Vec<RankedPaper>> {
        self.vectorizer.fit(&corpus.documents)?;

        let query = self.vectorizer.transform(&document_text(title, abstract_text))?;
        if query.is_zero() {
            warn!("Query shares no terms with the corpus vocabulary; every score is 0");
        }

        let mut ranked = Vec::with_capacity(corpus.len());
        for (paper_id, document) in corpus.ids.iter().zip(&corpus.documents) {
            let vector = self.vectorizer.transform(document)?;
            let score = self.vectorizer.similarity(&query, &vector)?;
            ranked.push(RankedPaper {
                paper_id: paper_id.clone(),
                score,
            });
        }

        // Stable sort: ties stay in corpus order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.top_k);

        debug!(
            corpus = corpus.len(),
            vocabulary = self.vectorizer.vocabulary_size(),
            returned = ranked.len(),
            top_score = ?ranked.first().map(|p| p.score),
            "Ranking complete"
        );

        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::TfidfVectorizer;
    use paperlens_common::errors::AppError;

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.push("p-attention", "Attention Is All You Need transformers rely on self attention for translation");
        corpus.push("p-graph", "Citation Graph Analysis degree distribution of scholarly citation networks");
        corpus.push("p-protein", "Protein Folding predicting structures with deep learning");
        corpus.push("p-bert", "BERT pretraining deep bidirectional transformers for language understanding");
        corpus
    }

    fn ranker(top_k: usize) -> SimilarityRanker<TfidfVectorizer> {
        SimilarityRanker::new(TfidfVectorizer::new(10_000).unwrap(), top_k)
    }

    #[test]
    fn test_identical_query_ranks_first() {
        let corpus = sample_corpus();
        let ranked = ranker(10)
            .rank(
                &corpus,
                "Citation Graph Analysis",
                "degree distribution of scholarly citation networks",
            )
            .unwrap();

        assert_eq!(ranked[0].paper_id, "p-graph");
        assert!((ranked[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_output_length_is_min_of_k_and_corpus() {
        let corpus = sample_corpus();

        let ranked = ranker(10).rank(&corpus, "transformers", "attention").unwrap();
        assert_eq!(ranked.len(), 4);

        let ranked = ranker(2).rank(&corpus, "transformers", "attention").unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_scores_descend_and_ties_keep_corpus_order() {
        let corpus = sample_corpus();
        let ranked = ranker(10)
            .rank(&corpus, "quantum", "chromodynamics lattice")
            .unwrap();

        // Nothing matches: every score is zero, order is corpus order
        let ids: Vec<&str> = ranked.iter().map(|p| p.paper_id.as_str()).collect();
        assert_eq!(ids, vec!["p-attention", "p-graph", "p-protein", "p-bert"]);
        assert!(ranked.iter().all(|p| p.score == 0.0));

        let ranked = ranker(10).rank(&corpus, "deep transformers", "").unwrap();
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_empty_corpus_fails_loudly() {
        let err = ranker(10).rank(&Corpus::new(), "title", "abstract").unwrap_err();
        assert!(matches!(err, AppError::EmptyVocabulary));
    }
}
