use serde::Deserialize;

/// Main configuration structure for Jobspider
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            browser: BrowserConfig::default(),
            storage: StorageConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl pacing and navigation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL of the recruiting site index page
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Seconds to wait after the index loads, leaving time to complete a
    /// manual verification challenge before the menu is opened
    #[serde(rename = "verification-wait-secs")]
    pub verification_wait_secs: u64,

    /// Lower bound of the randomized pause between the two lazy-load
    /// scrolls (milliseconds)
    #[serde(rename = "scroll-pause-min-ms")]
    pub scroll_pause_min_ms: u64,

    /// Upper bound of the randomized scroll pause (milliseconds)
    #[serde(rename = "scroll-pause-max-ms")]
    pub scroll_pause_max_ms: u64,

    /// Settle time after reloading the index during recovery (milliseconds)
    #[serde(rename = "recovery-settle-ms")]
    pub recovery_settle_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            index_url: "https://www.zhipin.com/?city=100010000&ka=city-sites-100010000"
                .to_string(),
            verification_wait_secs: 15,
            scroll_pause_min_ms: 4_000,
            scroll_pause_max_ms: 10_000,
            recovery_settle_ms: 5_000,
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Driver type; only "chrome" is supported
    #[serde(rename = "driver-type")]
    pub driver_type: String,

    /// Explicit path to the Chrome binary, if not on PATH
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<String>,

    /// Run the browser without a visible window
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            driver_type: "chrome".to_string(),
            chrome_path: None,
            headless: false,
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Preferred backend; the router falls back to CSV when the relational
    /// backend cannot initialize
    pub backend: BackendKind,

    /// SQLite database file name, created under the output directory
    #[serde(rename = "database-file")]
    pub database_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            database_file: "job_info.db".to_string(),
        }
    }
}

/// The closed set of storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Csv,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Csv => "csv",
        }
    }
}

/// Output placement configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives the database, CSV files and progress file
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "result".to_string(),
        }
    }
}
