//! PaperLens Common Library
//!
//! Shared code for the PaperLens programs including:
//! - Dataset layout and paper loading
//! - Error types and handling
//! - Configuration management
//! - Tracing setup

pub mod config;
pub mod dataset;
pub mod errors;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use dataset::{Corpus, DatasetLayout, Paper};
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read `.env`, load configuration, and install tracing.
///
/// Shared start-up sequence of every binary.
pub fn bootstrap() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.observability);
    Ok(config)
}
