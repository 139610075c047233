use crate::config::types::{BrowserConfig, Config, CrawlerConfig, OutputConfig, StorageConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_storage_config(&config.storage)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl pacing configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    Url::parse(&config.index_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid index-url: {}", e)))?;

    if config.scroll_pause_min_ms > config.scroll_pause_max_ms {
        return Err(ConfigError::Validation(format!(
            "scroll-pause-min-ms ({}) must not exceed scroll-pause-max-ms ({})",
            config.scroll_pause_min_ms, config.scroll_pause_max_ms
        )));
    }

    if config.scroll_pause_max_ms == 0 {
        return Err(ConfigError::Validation(
            "scroll-pause-max-ms must be > 0; the scroll pause is a pacing \
             measure and may be shortened but not removed"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.driver_type != "chrome" {
        return Err(ConfigError::Validation(format!(
            "driver-type '{}' is not supported; only 'chrome' is available",
            config.driver_type
        )));
    }

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_file.is_empty() {
        return Err(ConfigError::Validation(
            "database-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
