//! PaperLens Dataset Fetcher
//!
//! Prepares the citation dataset and builds its graph:
//! 1. Downloads the archive unless it is already present
//! 2. Extracts it unless the dataset directory already exists
//! 3. Runs `generate-graph` on the dataset and waits for it

mod fetcher;

use clap::Parser;
use fetcher::DatasetFetcher;
use paperlens_common::{bootstrap, AppConfig, Result, VERSION};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "fetch-dataset", version, about = "Download the paper dataset and build its citation graph")]
struct Cli {
    /// Archive location (defaults to `fetch.archive_path`)
    #[arg(long = "archive-path")]
    archive_path: Option<PathBuf>,

    /// Extraction directory (defaults to `fetch.data_dir`)
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Download URL (defaults to the configured Google Drive file)
    #[arg(long = "url")]
    url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match bootstrap() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(cli, config).await {
        error!(error = %e, code = ?e.code(), "Dataset fetch failed");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, mut config: AppConfig) -> Result<()> {
    info!("Starting PaperLens dataset fetcher v{}", VERSION);

    if let Some(archive_path) = cli.archive_path {
        config.fetch.archive_path = archive_path;
    }
    if let Some(data_dir) = cli.data_dir {
        config.fetch.data_dir = data_dir;
    }
    if let Some(url) = cli.url {
        config.fetch.download_url = Some(url);
    }

    let fetcher = DatasetFetcher::from_config(&config.fetch)?;
    let report = fetcher.run().await?;

    info!(
        downloaded = report.downloaded,
        extracted = report.extracted,
        "Dataset ready and citation graph built"
    );
    Ok(())
}
