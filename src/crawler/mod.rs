//! Crawl orchestration
//!
//! This module contains the crawl loop proper:
//! - durable progress tracking for resumable runs
//! - the category navigator and its cycle state machine
//! - the orchestrator that walks every category and persists batches

mod navigator;
mod orchestrator;
mod progress;

pub use navigator::{CyclePhase, Navigator, Pacing};
pub use orchestrator::{Orchestrator, RunSummary};
pub use progress::ProgressFile;

use crate::browser::ChromeSession;
use crate::config::Config;
use crate::extract::BossListingParser;
use crate::storage::StorageRouter;
use crate::Result;
use std::path::Path;
use std::time::Duration;

/// Runs a complete crawl: opens storage, launches the browser, walks every
/// category, and releases resources on every exit path.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `output_dir` - Resolved directory for storage and progress files
/// * `resume` - Whether to continue from a saved progress index
pub fn run_crawl(config: &Config, output_dir: &Path, resume: bool) -> Result<RunSummary> {
    std::fs::create_dir_all(output_dir)?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let router = StorageRouter::open(&config.storage, output_dir, &date)?;

    let session = ChromeSession::launch(&config.browser, &config.crawler.index_url)?;
    let navigator = Navigator::new(
        session,
        BossListingParser::new(),
        Pacing::from_config(&config.crawler),
    );

    let mut orchestrator = Orchestrator::new(
        navigator,
        router,
        ProgressFile::new(output_dir),
        Duration::from_secs(config.crawler.verification_wait_secs),
        resume,
    );

    let result = orchestrator.run();
    orchestrator.shutdown();
    result
}
