//! Error types for PaperLens programs
//!
//! Provides a single error type shared by the ranker, the graph builder and
//! the dataset fetcher, with:
//! - Distinct variants for each failure mode
//! - Machine-readable error codes
//! - Process exit code mapping for the binaries

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Dataset errors (1xxx)
    DatasetNotFound,
    EmptyCorpus,

    // Vectorizer errors (2xxx)
    EmptyVocabulary,
    VectorizerNotFitted,
    DimensionMismatch,

    // Graph errors (3xxx)
    EmptyGraph,
    UnknownNode,

    // Fetch errors (4xxx)
    DownloadError,
    UpstreamError,
    ExtractionError,
    SubprocessError,

    // Output errors (5xxx)
    RenderError,

    // Internal errors (9xxx)
    IoError,
    ConfigurationError,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Dataset (1xxx)
            ErrorCode::DatasetNotFound => 1001,
            ErrorCode::EmptyCorpus => 1002,

            // Vectorizer (2xxx)
            ErrorCode::EmptyVocabulary => 2001,
            ErrorCode::VectorizerNotFitted => 2002,
            ErrorCode::DimensionMismatch => 2003,

            // Graph (3xxx)
            ErrorCode::EmptyGraph => 3001,
            ErrorCode::UnknownNode => 3002,

            // Fetch (4xxx)
            ErrorCode::DownloadError => 4001,
            ErrorCode::UpstreamError => 4002,
            ErrorCode::ExtractionError => 4003,
            ErrorCode::SubprocessError => 4004,

            // Output (5xxx)
            ErrorCode::RenderError => 5001,

            // Internal (9xxx)
            ErrorCode::IoError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::InternalError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Dataset errors
    #[error("Dataset directory not found: {}", path.display())]
    DatasetNotFound { path: PathBuf },

    #[error("No valid paper folders found under {}", path.display())]
    EmptyCorpus { path: PathBuf },

    // Vectorizer errors
    #[error("Empty vocabulary: the documents contain no indexable terms (only stop words or no words at all)")]
    EmptyVocabulary,

    #[error("Vectorizer used before fit")]
    VectorizerNotFitted,

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Graph errors
    #[error("Graph has no nodes; statistics are undefined")]
    EmptyGraph,

    #[error("Unknown graph node: {id}")]
    UnknownNode { id: String },

    // Fetch errors
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to extract {}: {message}", archive.display())]
    Extraction { archive: PathBuf, message: String },

    #[error("Command `{command}` failed: {message}")]
    Subprocess { command: String, message: String },

    // Output errors
    #[error("Failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    // Internal errors
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::DatasetNotFound { .. } => ErrorCode::DatasetNotFound,
            AppError::EmptyCorpus { .. } => ErrorCode::EmptyCorpus,
            AppError::EmptyVocabulary => ErrorCode::EmptyVocabulary,
            AppError::VectorizerNotFitted => ErrorCode::VectorizerNotFitted,
            AppError::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            AppError::EmptyGraph => ErrorCode::EmptyGraph,
            AppError::UnknownNode { .. } => ErrorCode::UnknownNode,
            AppError::Download { .. } => ErrorCode::DownloadError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Extraction { .. } => ErrorCode::ExtractionError,
            AppError::Subprocess { .. } => ErrorCode::SubprocessError,
            AppError::Render { .. } => ErrorCode::RenderError,
            AppError::Io { .. } => ErrorCode::IoError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // Bad input: missing or unusable dataset
            AppError::DatasetNotFound { .. }
            | AppError::EmptyCorpus { .. }
            | AppError::EmptyVocabulary
            | AppError::EmptyGraph => 2,

            // Configuration problems
            AppError::Configuration { .. } => 3,

            // External collaborators failed
            _ if self.is_external() => 4,

            _ => 1,
        }
    }

    /// Check if the failure came from something outside this process
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            AppError::Download { .. }
                | AppError::HttpClient(_)
                | AppError::Extraction { .. }
                | AppError::Subprocess { .. }
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::EmptyCorpus {
            path: PathBuf::from("dataset_papers"),
        };
        assert_eq!(err.code(), ErrorCode::EmptyCorpus);
        assert_eq!(err.code().as_code(), 1002);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_subprocess_error_is_external() {
        let err = AppError::Subprocess {
            command: "generate-graph".into(),
            message: "exit status: 1".into(),
        };
        assert_eq!(err.code(), ErrorCode::SubprocessError);
        assert!(err.is_external());
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("generate-graph"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AppError::io("papers/p1/title.txt", source);
        assert_eq!(err.code(), ErrorCode::IoError);
        assert!(err.to_string().contains("papers/p1/title.txt"));
        assert!(!err.is_external());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_configuration_error_exit_code() {
        let err = AppError::Configuration {
            message: "histogram needs at least one bin".into(),
        };
        assert!(!err.is_external());
        assert_eq!(err.exit_code(), 3);
    }
}
