//! Crawl orchestrator
//!
//! Drives the navigator across the full category set, persisting each
//! non-empty batch through the storage router. A single category's failure
//! never halts the crawl; the run only ends early when the recovery path
//! itself fails, with the last progress index already durable.

use crate::browser::{Category, Session};
use crate::crawler::navigator::Navigator;
use crate::crawler::progress::ProgressFile;
use crate::extract::ListingParser;
use crate::region::CityIndex;
use crate::storage::StorageRouter;
use crate::{Result, SpiderError};
use std::time::Duration;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub categories_attempted: usize,
    pub categories_failed: usize,
    pub records_written: usize,
}

/// Owns the browser session and storage for the lifetime of one crawl run
pub struct Orchestrator<S, P> {
    navigator: Navigator<S, P>,
    router: StorageRouter,
    progress: ProgressFile,
    cities: CityIndex,
    verification_wait: Duration,
    resume: bool,
}

impl<S: Session, P: ListingParser> Orchestrator<S, P> {
    pub fn new(
        navigator: Navigator<S, P>,
        router: StorageRouter,
        progress: ProgressFile,
        verification_wait: Duration,
        resume: bool,
    ) -> Self {
        Self {
            navigator,
            router,
            progress,
            cities: CityIndex::builtin(),
            verification_wait,
            resume,
        }
    }

    /// Runs the crawl to completion.
    ///
    /// One cycle per category index, from the resume point to the live
    /// category count. The count is re-read after every return to the menu
    /// since the menu can reload with different contents. No category is
    /// retried within a run.
    pub fn run(&mut self) -> Result<RunSummary> {
        let create_time = chrono::Local::now().format("%Y-%m-%d").to_string();

        let start_index = if self.resume { self.progress.load() } else { 0 };
        if start_index > 0 {
            tracing::info!("Resuming crawl from category index {}", start_index);
        }

        self.navigator.open_index()?;
        if !self.verification_wait.is_zero() {
            tracing::info!(
                "Waiting {}s for manual verification before opening the menu",
                self.verification_wait.as_secs()
            );
            std::thread::sleep(self.verification_wait);
        }

        if let Err(e) = self.navigator.open_menu() {
            tracing::warn!("Failed to open the category menu ({}), retrying", e);
            self.recover(start_index)?;
        }

        let mut summary = RunSummary::default();
        let mut index = start_index;

        loop {
            let categories = match self.navigator.list_categories() {
                Ok(categories) => categories,
                Err(e) => {
                    tracing::warn!("Failed to read the category menu ({}), recovering", e);
                    self.recover(index)?;
                    self.navigator
                        .list_categories()
                        .map_err(|source| SpiderError::RecoveryFailed { index, source })?
                }
            };

            if index >= categories.len() {
                break;
            }
            let category = categories[index].clone();

            // Durable before the outcome is known; a restarted run
            // re-attempts this category and may re-insert its records.
            self.progress.save(index)?;
            tracing::info!(
                "Crawling category {}: {}--{}",
                index,
                category.name,
                category.sub_name
            );

            match self.crawl_category(&category, &create_time) {
                Ok(written) => summary.records_written += written,
                Err(e) => {
                    tracing::error!("Category {} failed: {}", index, e);
                    summary.categories_failed += 1;
                    self.recover(index)?;
                }
            }

            summary.categories_attempted += 1;
            index += 1;
        }

        tracing::info!(
            "Crawl finished: {} categories attempted ({} failed), {} records written via {}",
            summary.categories_attempted,
            summary.categories_failed,
            summary.records_written,
            self.router.backend_name()
        );
        Ok(summary)
    }

    /// One category cycle: select, load, extract, save, return
    fn crawl_category(&mut self, category: &Category, create_time: &str) -> Result<usize> {
        self.navigator.select_category(category.index)?;
        self.navigator.load_listings()?;
        let batch = self
            .navigator
            .extract_listings(category, create_time, &self.cities)?;

        let written = if batch.is_empty() {
            tracing::info!("No valid listings in category {}", category.index);
            0
        } else {
            let written = self.router.save(&batch)?;
            tracing::info!(
                "Persisted {} records for category {}",
                written,
                category.index
            );
            written
        };

        self.navigator.return_to_menu()?;
        Ok(written)
    }

    fn recover(&mut self, index: usize) -> Result<()> {
        self.navigator
            .recover()
            .map_err(|source| SpiderError::RecoveryFailed { index, source })
    }

    /// Releases storage; the browser session closes when the orchestrator
    /// is dropped
    pub fn shutdown(&mut self) {
        if let Err(e) = self.router.close() {
            tracing::warn!("Failed to close storage: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::scripted::ScriptedSession;
    use crate::config::{BackendKind, StorageConfig};
    use crate::crawler::navigator::Pacing;
    use crate::extract::fixtures::{listing_html, listing_html_missing_salary};
    use crate::extract::BossListingParser;
    use crate::record::JobRecord;
    use crate::storage::{CsvBackend, StorageBackend};
    use std::path::Path;
    use tempfile::TempDir;

    const DATE: &str = "2023-12-22";

    fn orchestrator(
        session: ScriptedSession,
        dir: &Path,
        resume: bool,
    ) -> Orchestrator<ScriptedSession, BossListingParser> {
        let navigator = Navigator::new(session, BossListingParser::new(), Pacing::none());
        let config = StorageConfig {
            backend: BackendKind::Csv,
            ..StorageConfig::default()
        };
        let router = StorageRouter::open(&config, dir, DATE).unwrap();
        let progress = ProgressFile::new(dir);
        Orchestrator::new(navigator, router, progress, Duration::ZERO, resume)
    }

    fn stored_records(dir: &Path) -> Vec<JobRecord> {
        let mut backend = CsvBackend::new(dir, DATE);
        backend.read(None).unwrap()
    }

    #[test]
    fn test_two_category_run_persists_only_valid_records() {
        // First category: two valid listings and one missing its salary.
        // Second category: an empty page.
        let session = ScriptedSession::new(
            &[("IT", "Backend"), ("IT", "Frontend")],
            vec![
                vec![
                    listing_html("Rust工程师", "北京·海淀区", "20-40K"),
                    listing_html("Go工程师", "上海·浦东新区", "18-35K"),
                    listing_html_missing_salary("Java工程师"),
                ],
                vec![],
            ],
        );

        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(session, dir.path(), false);
        let summary = orch.run().unwrap();
        orch.shutdown();

        assert_eq!(summary.categories_attempted, 2);
        assert_eq!(summary.categories_failed, 0);
        assert_eq!(summary.records_written, 2);

        let records = stored_records(dir.path());
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.category, "IT");
            assert_eq!(record.sub_category, "Backend");
        }
        assert_eq!(records[0].job_title, "Rust工程师");
        assert_eq!(records[0].province, "北京");
        assert_eq!(records[1].job_title, "Go工程师");
        assert_eq!(records[1].province, "上海");

        // Progress ends at the last attempted index.
        let content = std::fs::read_to_string(dir.path().join("crawl_progress.txt")).unwrap();
        assert_eq!(content, "1");
    }

    #[test]
    fn test_continue_on_error_reaches_later_categories() {
        let mut session = ScriptedSession::new(
            &[("IT", "Backend"), ("IT", "Frontend"), ("IT", "Mobile")],
            vec![
                vec![listing_html("Rust工程师", "北京·海淀区", "20-40K")],
                vec![listing_html("前端工程师", "杭州·余杭区", "15-30K")],
                vec![listing_html("Android工程师", "广州·天河区", "18-32K")],
            ],
        );
        session.failing_selects = vec![1];

        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(session, dir.path(), false);
        let summary = orch.run().unwrap();

        assert_eq!(summary.categories_attempted, 3);
        assert_eq!(summary.categories_failed, 1);
        assert_eq!(summary.records_written, 2);

        let titles: Vec<_> = stored_records(dir.path())
            .into_iter()
            .map(|r| r.job_title)
            .collect();
        assert_eq!(titles, vec!["Rust工程师", "Android工程师"]);
    }

    #[test]
    fn test_recovery_failure_ends_run_early() {
        let mut session = ScriptedSession::new(
            &[("IT", "Backend"), ("IT", "Frontend")],
            vec![vec![], vec![]],
        );
        session.failing_selects = vec![0];
        // The initial menu open succeeds; every later attempt fails, so
        // the recovery path cannot reopen the menu.
        session.menu_failures_after = 1;

        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(session, dir.path(), false);
        let result = orch.run();

        assert!(matches!(
            result,
            Err(SpiderError::RecoveryFailed { index: 0, .. })
        ));
        // The attempted index was durable before the failure.
        let content = std::fs::read_to_string(dir.path().join("crawl_progress.txt")).unwrap();
        assert_eq!(content, "0");
    }

    #[test]
    fn test_resume_rescrapes_saved_category_and_duplicates() {
        let listings = || {
            vec![
                vec![listing_html("Rust工程师", "北京·海淀区", "20-40K")],
                vec![listing_html("前端工程师", "杭州·余杭区", "15-30K")],
            ]
        };
        let categories: &[(&str, &str)] = &[("IT", "Backend"), ("IT", "Frontend")];

        let dir = TempDir::new().unwrap();

        let mut first = orchestrator(
            ScriptedSession::new(categories, listings()),
            dir.path(),
            false,
        );
        first.run().unwrap();
        assert_eq!(stored_records(dir.path()).len(), 2);

        // Progress ended at index 1; resuming re-attempts that category
        // and re-inserts its records. There is deliberately no dedup.
        let mut second = orchestrator(
            ScriptedSession::new(categories, listings()),
            dir.path(),
            true,
        );
        second.run().unwrap();

        let records = stored_records(dir.path());
        assert_eq!(records.len(), 3);
        let frontend_count = records
            .iter()
            .filter(|r| r.job_title == "前端工程师")
            .count();
        assert_eq!(frontend_count, 2);
    }

    #[test]
    fn test_fresh_run_ignores_saved_progress() {
        let dir = TempDir::new().unwrap();
        ProgressFile::new(dir.path()).save(1).unwrap();

        let session = ScriptedSession::new(
            &[("IT", "Backend"), ("IT", "Frontend")],
            vec![
                vec![listing_html("Rust工程师", "北京·海淀区", "20-40K")],
                vec![],
            ],
        );
        let mut orch = orchestrator(session, dir.path(), false);
        let summary = orch.run().unwrap();

        // Both categories were crawled from the start.
        assert_eq!(summary.categories_attempted, 2);
        assert_eq!(summary.records_written, 1);
    }

    #[test]
    fn test_empty_menu_is_an_empty_run() {
        let session = ScriptedSession::new(&[], vec![]);
        let dir = TempDir::new().unwrap();
        let mut orch = orchestrator(session, dir.path(), false);
        let summary = orch.run().unwrap();

        assert_eq!(summary, RunSummary::default());
        assert!(stored_records(dir.path()).is_empty());
    }
}
