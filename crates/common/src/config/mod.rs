//! Configuration management for PaperLens programs
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Dataset layout
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Similarity ranking configuration
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Citation graph configuration
    #[serde(default)]
    pub graph: GraphConfig,

    /// Dataset fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Root folder containing one subdirectory per paper
    #[serde(default = "default_dataset_root")]
    pub root: PathBuf,

    /// Title file name inside each paper folder
    #[serde(default = "default_title_file")]
    pub title_file: String,

    /// Abstract file name inside each paper folder
    #[serde(default = "default_abstract_file")]
    pub abstract_file: String,

    /// Extension of bibliography files (without the dot)
    #[serde(default = "default_bibliography_extension")]
    pub bibliography_extension: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RankingConfig {
    /// Number of papers to return
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Vocabulary cap (most frequent terms across the corpus)
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Output path of the degree histogram image
    #[serde(default = "default_histogram_path")]
    pub histogram_path: PathBuf,

    /// Number of histogram bins
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Image width in pixels
    #[serde(default = "default_histogram_width")]
    pub histogram_width: u32,

    /// Image height in pixels
    #[serde(default = "default_histogram_height")]
    pub histogram_height: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Google Drive file id of the dataset archive
    #[serde(default = "default_file_id")]
    pub file_id: String,

    /// Explicit download URL (overrides the file id)
    pub download_url: Option<String>,

    /// Local archive path
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,

    /// Directory the archive extracts to
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Graph builder executable (resolved next to the current binary first)
    #[serde(default = "default_graph_builder")]
    pub graph_builder: String,

    /// User agent for dataset downloads
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,
}

// Default value functions
fn default_dataset_root() -> PathBuf { PathBuf::from("dataset_papers") }
fn default_title_file() -> String { "title.txt".to_string() }
fn default_abstract_file() -> String { "abstract.txt".to_string() }
fn default_bibliography_extension() -> String { "bib".to_string() }
fn default_top_k() -> usize { 10 }
fn default_max_features() -> usize { 10_000 }
fn default_histogram_path() -> PathBuf { PathBuf::from("degree_histogram.png") }
fn default_histogram_bins() -> usize { 50 }
fn default_histogram_width() -> u32 { 1000 }
fn default_histogram_height() -> u32 { 600 }
fn default_file_id() -> String { "1J73io_KqCoPEAlH3teLWGoZ78yk5n7ll".to_string() }
fn default_archive_path() -> PathBuf { PathBuf::from("dataset_papers.tar.gz") }
fn default_data_dir() -> PathBuf { PathBuf::from("dataset_papers") }
fn default_graph_builder() -> String { "generate-graph".to_string() }
fn default_user_agent() -> String { format!("paperlens/{}", crate::VERSION) }
fn default_connect_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { false }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__RANKING__TOP_K=20
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }
}

impl FetchConfig {
    /// Get the download connect timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// URL the archive is fetched from
    pub fn resolved_download_url(&self) -> String {
        match &self.download_url {
            Some(url) => url.clone(),
            None => format!("https://drive.google.com/uc?export=download&id={}", self.file_id),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            ranking: RankingConfig::default(),
            graph: GraphConfig::default(),
            fetch: FetchConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: default_dataset_root(),
            title_file: default_title_file(),
            abstract_file: default_abstract_file(),
            bibliography_extension: default_bibliography_extension(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_features: default_max_features(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            histogram_path: default_histogram_path(),
            histogram_bins: default_histogram_bins(),
            histogram_width: default_histogram_width(),
            histogram_height: default_histogram_height(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            file_id: default_file_id(),
            download_url: None,
            archive_path: default_archive_path(),
            data_dir: default_data_dir(),
            graph_builder: default_graph_builder(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
        }
    }
}
