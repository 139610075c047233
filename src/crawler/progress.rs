//! Crawl progress persistence
//!
//! A single ASCII integer, the index of the last category attempted,
//! overwritten at the start of every cycle. There is no transactional link
//! between progress and written records: resuming re-attempts the saved
//! category and may duplicate its records.

use std::path::{Path, PathBuf};

const PROGRESS_FILE_NAME: &str = "crawl_progress.txt";

/// The crawl's durable resume point
pub struct ProgressFile {
    path: PathBuf,
}

impl ProgressFile {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(PROGRESS_FILE_NAME),
        }
    }

    /// Overwrites the file with the given category index
    pub fn save(&self, index: usize) -> std::io::Result<()> {
        std::fs::write(&self.path, index.to_string())
    }

    /// Reads the saved index; a missing or garbled file means start over
    pub fn load(&self) -> usize {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| content.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
