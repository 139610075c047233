//! Configuration handling
//!
//! TOML-based configuration with validation and content hashing. Every
//! setting has a default, so the crawler runs without a config file.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    BackendKind, BrowserConfig, Config, CrawlerConfig, OutputConfig, StorageConfig,
};
pub use validation::validate;
