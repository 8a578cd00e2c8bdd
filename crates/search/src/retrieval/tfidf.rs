//! TF-IDF vectorizer
//!
//! Follows the scikit-learn `TfidfVectorizer` defaults the rankings are
//! expected to match: lowercase, Unicode `\b\w\w+\b` tokens, English stop
//! words, vocabulary capped by corpus term frequency, smooth IDF, raw term
//! counts, L2 normalization.
//!
//! Stop words are the NLTK English list. The much larger stopwords-iso list
//! removes ordinary research vocabulary ("large", "results", "state").

use super::vector::SparseVector;
use super::TextVectorizer;
use paperlens_common::errors::{AppError, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use stop_words::{get, LANGUAGE};
use tracing::debug;

/// Fitted vocabulary and per-term IDF weights
#[derive(Debug, Clone)]
struct TfidfModel {
    vocab: HashMap<String, usize>,
    idf: Vec<f32>,
}

/// TF-IDF vectorizer
pub struct TfidfVectorizer {
    max_features: usize,
    token_re: Regex,
    stop_words: HashSet<String>,
    model: Option<TfidfModel>,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer keeping at most `max_features` terms
    pub fn new(max_features: usize) -> Result<Self> {
        let token_re = Regex::new(r"(?u)\b\w\w+\b").map_err(|e| AppError::Internal {
            message: format!("invalid token pattern: {}", e),
        })?;

        let stop_words = get(LANGUAGE::English)
            .iter()
            .map(|word| word.to_string().to_lowercase())
            .collect();

        Ok(Self {
            max_features,
            token_re,
            stop_words,
            model: None,
        })
    }

    /// Lowercased tokens with stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    fn count_terms(&self, text: &str) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
impl TfidfVectorizer {
    fn term_index(&self, term: &str) -> Option<usize> {
        self.model.as_ref()?.vocab.get(term).copied()
    }

    fn idf(&self, term: &str) -> Option<f32> {
        let model = self.model.as_ref()?;
        model.vocab.get(term).map(|&idx| model.idf[idx])
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn fit(&mut self, corpus: &[String]) -> Result<()> {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for document in corpus {
            for (term, count) in self.count_terms(document) {
                *term_counts.entry(term.clone()).or_insert(0) += count;
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(AppError::EmptyVocabulary);
        }

        // Most frequent first, ties alphabetical
        let mut term_pairs: Vec<(String, usize)> = term_counts.into_iter().collect();
        term_pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        term_pairs.truncate(self.max_features);

        let vocab: HashMap<String, usize> = term_pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (term, _))| (term, idx))
            .collect();

        let doc_count = corpus.len() as f32;
        let mut idf = vec![0.0; vocab.len()];
        for (term, &idx) in &vocab {
            let df = *doc_freq.get(term).unwrap_or(&0) as f32;
            idf[idx] = ((1.0 + doc_count) / (1.0 + df)).ln() + 1.0;
        }

        debug!(
            documents = corpus.len(),
            vocabulary = vocab.len(),
            max_features = self.max_features,
            "TF-IDF vectorizer fitted"
        );

        self.model = Some(TfidfModel { vocab, idf });
        Ok(())
    }

    fn transform(&self, text: &str) -> Result<SparseVector> {
        let model = self.model.as_ref().ok_or(AppError::VectorizerNotFitted)?;

        let entries: Vec<(usize, f32)> = self
            .count_terms(text)
            .into_iter()
            .filter_map(|(term, count)| {
                model
                    .vocab
                    .get(&term)
                    .map(|&idx| (idx, count as f32 * model.idf[idx]))
            })
            .collect();

        let mut vector = SparseVector::from_entries(model.idf.len(), entries)?;
        vector.normalize();
        Ok(vector)
    }

    fn similarity(&self, a: &SparseVector, b: &SparseVector) -> Result<f32> {
        a.cosine(b)
    }

    fn vocabulary_size(&self) -> usize {
        self.model.as_ref().map(|m| m.idf.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Vec<String> {
        docs.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let vectorizer = TfidfVectorizer::new(100).unwrap();
        let tokens = vectorizer.tokenize("The Transformer is a model, x y GPT-2!");
        assert!(tokens.contains(&"transformer".to_string()));
        assert!(tokens.contains(&"gpt".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.iter().any(|t| t.len() < 2));
    }

    #[test]
    fn test_stop_words_keep_research_vocabulary() {
        let vectorizer = TfidfVectorizer::new(100).unwrap();
        let tokens = vectorizer.tokenize(
            "The large language models need information research on problem results state world",
        );

        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"on".to_string()));
        for term in [
            "large",
            "language",
            "models",
            "need",
            "information",
            "research",
            "problem",
            "results",
            "state",
            "world",
        ] {
            assert!(tokens.contains(&term.to_string()), "{term} was dropped");
        }
    }

    #[test]
    fn test_tokens_are_unicode_aware() {
        let vectorizer = TfidfVectorizer::new(100).unwrap();
        let tokens = vectorizer.tokenize("Über Graphen: résumé naïve");
        assert_eq!(tokens, vec!["über", "graphen", "résumé", "naïve"]);
    }

    #[test]
    fn test_smooth_idf() {
        let mut vectorizer = TfidfVectorizer::new(100).unwrap();
        vectorizer
            .fit(&corpus(&["graph neural network", "graph database", "protein folding"]))
            .unwrap();

        // df(graph) = 2, n = 3 -> ln(4/3) + 1
        let expected = (4.0f32 / 3.0).ln() + 1.0;
        assert!((vectorizer.idf("graph").unwrap() - expected).abs() < 1e-6);
        // df(protein) = 1 -> ln(4/2) + 1
        let expected = 2.0f32.ln() + 1.0;
        assert!((vectorizer.idf("protein").unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut vectorizer = TfidfVectorizer::new(2).unwrap();
        vectorizer
            .fit(&corpus(&["alpha alpha alpha beta beta gamma", "alpha beta delta"]))
            .unwrap();

        assert_eq!(vectorizer.vocabulary_size(), 2);
        assert!(vectorizer.term_index("alpha").is_some());
        assert!(vectorizer.term_index("beta").is_some());
        assert!(vectorizer.term_index("gamma").is_none());
    }

    #[test]
    fn test_transform_is_unit_length() {
        let mut vectorizer = TfidfVectorizer::new(100).unwrap();
        vectorizer
            .fit(&corpus(&["citation graph analysis", "text similarity ranking"]))
            .unwrap();

        let v = vectorizer.transform("citation ranking ranking").unwrap();
        assert!((v.norm() - 1.0).abs() < 1e-5);

        let unknown = vectorizer.transform("completely unrelated words").unwrap();
        assert!(unknown.is_zero());
    }

    #[test]
    fn test_identical_text_has_similarity_one() {
        let docs = corpus(&["sparse attention transformers", "citation graph metrics"]);
        let mut vectorizer = TfidfVectorizer::new(100).unwrap();
        vectorizer.fit(&docs).unwrap();

        let a = vectorizer.transform(&docs[0]).unwrap();
        let b = vectorizer.transform(&docs[0]).unwrap();
        assert!((vectorizer.similarity(&a, &b).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_vocabulary() {
        let mut vectorizer = TfidfVectorizer::new(100).unwrap();
        let err = vectorizer.fit(&corpus(&["the and of", "a"])).unwrap_err();
        assert!(matches!(err, AppError::EmptyVocabulary));

        let err = vectorizer.fit(&[]).unwrap_err();
        assert!(matches!(err, AppError::EmptyVocabulary));
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfidfVectorizer::new(100).unwrap();
        let err = vectorizer.transform("anything").unwrap_err();
        assert!(matches!(err, AppError::VectorizerNotFitted));
    }
}
