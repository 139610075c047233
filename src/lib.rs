//! Jobspider: a job-listing crawler with resilient storage
//!
//! This crate drives a headless browser through the category menu of a
//! recruiting site, normalizes the scraped listings into flat records, and
//! persists them with automatic failover between a SQLite store and a CSV
//! store.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod record;
pub mod region;
pub mod storage;

use thiserror::Error;

/// Main error type for Jobspider operations
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Recovery failed at category {index}: {source}")]
    RecoveryFailed {
        index: usize,
        source: browser::BrowserError,
    },

    #[error("Record error: {0}")]
    Record(#[from] record::RecordError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Jobspider operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Navigator, Orchestrator, RunSummary};
pub use record::JobRecord;
pub use region::CityIndex;
pub use storage::StorageRouter;
