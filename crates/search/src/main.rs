//! PaperLens Similarity Ranker
//!
//! Ranks every paper of a dataset against a query paper with TF-IDF cosine
//! similarity and prints the ids of the top K, one per line, most similar
//! first. Nothing else is ever written to stdout.

mod retrieval;

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use paperlens_common::{bootstrap, AppConfig, AppError, DatasetLayout, Result, VERSION};
use retrieval::{RankedPaper, SimilarityRanker, TfidfVectorizer};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "rank", version, about = "Rank dataset papers by similarity to a query paper")]
struct Cli {
    /// Title of the query paper
    #[arg(long = "test-paper-title", value_parser = NonEmptyStringValueParser::new())]
    test_paper_title: String,

    /// Abstract of the query paper
    #[arg(long = "test-paper-abstract", value_parser = NonEmptyStringValueParser::new())]
    test_paper_abstract: String,

    /// Dataset root (defaults to `dataset.root` from configuration)
    #[arg(long = "dataset-path")]
    dataset_path: Option<PathBuf>,

    /// Number of papers to print (defaults to `ranking.top_k`)
    #[arg(long = "top-k")]
    top_k: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(cli, &config) {
        error!(error = %e, code = ?e.code(), "Ranking failed");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    info!("Starting PaperLens ranker v{}", VERSION);

    let root = cli
        .dataset_path
        .unwrap_or_else(|| config.dataset.root.clone());
    let layout = DatasetLayout::from_config(root, &config.dataset);
    let corpus = layout.load_corpus()?;
    info!(papers = corpus.len(), root = %layout.root().display(), "Corpus loaded");

    let vectorizer = TfidfVectorizer::new(config.ranking.max_features)?;
    let top_k = cli.top_k.unwrap_or(config.ranking.top_k);
    let mut ranker = SimilarityRanker::new(vectorizer, top_k);

    let ranked = ranker.rank(&corpus, &cli.test_paper_title, &cli.test_paper_abstract)?;
    write_ranking(&mut io::stdout().lock(), &ranked)
}

/// One paper id per line, nothing else
fn write_ranking<W: Write>(out: &mut W, ranked: &[RankedPaper]) -> Result<()> {
    for paper in ranked {
        writeln!(out, "{}", paper.paper_id).map_err(|e| AppError::io("<stdout>", e))?;
    }
    out.flush().map_err(|e| AppError::io("<stdout>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_ranking_prints_only_ids() {
        let ranked = vec![
            RankedPaper { paper_id: "2401.00001".into(), score: 0.9 },
            RankedPaper { paper_id: "2401.00002".into(), score: 0.4 },
        ];
        let mut out = Vec::new();
        write_ranking(&mut out, &ranked).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2401.00001\n2401.00002\n");
    }

    #[test]
    fn test_cli_requires_both_query_fields() {
        assert!(Cli::try_parse_from(["rank", "--test-paper-title", "t"]).is_err());
        assert!(Cli::try_parse_from(["rank", "--test-paper-title", "", "--test-paper-abstract", "a"]).is_err());

        let cli = Cli::try_parse_from([
            "rank",
            "--test-paper-title",
            "Attention Is All You Need",
            "--test-paper-abstract",
            "We propose the Transformer",
        ])
        .unwrap();
        assert_eq!(cli.test_paper_title, "Attention Is All You Need");
        assert!(cli.dataset_path.is_none());
        assert!(cli.top_k.is_none());
    }
}
