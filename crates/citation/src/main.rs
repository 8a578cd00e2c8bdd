//! PaperLens Citation Graph
//!
//! Builds the citation graph of a dataset, prints its statistics, and saves
//! a histogram of the undirected node degrees.

mod citation;

use citation::{CitationGraph, DegreeHistogram, GraphEngine, GraphStats};
use clap::Parser;
use paperlens_common::{bootstrap, AppConfig, DatasetLayout, Result, VERSION};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "generate-graph", version, about = "Build and summarize a dataset's citation graph")]
struct Cli {
    /// Dataset root with one subdirectory per paper
    #[arg(long = "dataset-path")]
    dataset_path: PathBuf,

    /// Output image (defaults to `graph.histogram_path`)
    #[arg(long = "histogram-path")]
    histogram_path: Option<PathBuf>,

    /// Histogram bins (defaults to `graph.histogram_bins`)
    #[arg(long = "bins")]
    bins: Option<usize>,
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
        error!(error = %e, code = ?e.code(), "Citation graph failed");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    info!("Starting PaperLens citation graph v{}", VERSION);

    let layout = DatasetLayout::from_config(&cli.dataset_path, &config.dataset);
    let papers = layout.load_titled_papers()?;
    info!(papers = papers.len(), root = %layout.root().display(), "Papers loaded");

    let graph = CitationGraph::from_papers(&papers);
    let stats = GraphStats::compute(graph.engine())?;
    println!("{}", stats);

    let bins = cli.bins.unwrap_or(config.graph.histogram_bins);
    let histogram_path = cli
        .histogram_path
        .unwrap_or_else(|| config.graph.histogram_path.clone());

    let histogram = DegreeHistogram::compute(&graph.engine().undirected_degrees(), bins)?;
    histogram.render_png(
        &histogram_path,
        config.graph.histogram_width,
        config.graph.histogram_height,
    )?;
    println!("Saved degree histogram to {}", histogram_path.display());

    Ok(())
}
