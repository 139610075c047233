//! Storage router with backend failover
//!
//! Exactly one backend is active at a time. The relational backend is
//! preferred; if it cannot initialize, the router logs a warning and
//! activates the CSV backend instead. A relational write failure mid-run
//! also swaps to a fresh CSV backend and replays the in-flight batch, so
//! a batch is only lost when the fallback itself cannot take it.

use crate::config::{BackendKind, StorageConfig};
use crate::record::JobRecord;
use crate::storage::csv::CsvBackend;
use crate::storage::sqlite::SqliteBackend;
use crate::storage::traits::{StorageBackend, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Routes batch writes to the active storage backend
pub struct StorageRouter {
    backend: Box<dyn StorageBackend>,
    output_dir: PathBuf,
    date: String,
}

impl StorageRouter {
    /// Opens the preferred backend, falling back to CSV when the
    /// relational backend is unavailable. Both backends failing is fatal.
    pub fn open(config: &StorageConfig, output_dir: &Path, date: &str) -> StorageResult<Self> {
        let backend: Box<dyn StorageBackend> = match config.backend {
            BackendKind::Sqlite => {
                let mut sqlite = SqliteBackend::new(output_dir.join(&config.database_file));
                match sqlite.initialize() {
                    Ok(()) => {
                        tracing::info!("Using relational storage backend");
                        Box::new(sqlite)
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Relational backend unavailable ({}), switching to CSV storage",
                            e
                        );
                        Box::new(Self::open_csv(output_dir, date)?)
                    }
                }
            }
            BackendKind::Csv => Box::new(Self::open_csv(output_dir, date)?),
        };

        Ok(Self {
            backend,
            output_dir: output_dir.to_path_buf(),
            date: date.to_string(),
        })
    }

    fn open_csv(output_dir: &Path, date: &str) -> StorageResult<CsvBackend> {
        let mut csv = CsvBackend::new(output_dir, date);
        csv.initialize()?;
        tracing::info!("Using CSV storage backend");
        Ok(csv)
    }

    /// Persists a batch through the active backend.
    ///
    /// On a relational write failure the in-flight batch is replayed into
    /// a freshly initialized CSV backend, which then stays active for the
    /// rest of the run.
    pub fn save(&mut self, records: &[JobRecord]) -> StorageResult<usize> {
        match self.backend.write_batch(records) {
            Ok(written) => Ok(written),
            Err(e) if self.backend.name() == "sqlite" => {
                tracing::warn!(
                    "Write failed on relational backend ({}), retrying batch on CSV",
                    e
                );
                let mut csv = Self::open_csv(&self.output_dir, &self.date)
                    .map_err(|f| StorageError::WriteFailed(format!("CSV fallback: {f}")))?;
                let written = csv.write_batch(records)?;

                if let Err(close_err) = self.backend.close() {
                    tracing::warn!("Failed to close relational backend: {}", close_err);
                }
                self.backend = Box::new(csv);
                Ok(written)
            }
            Err(e) => Err(e),
        }
    }

    /// Name of the active backend, for log lines and the run summary
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Closes the active backend; safe to call multiple times
    pub fn close(&mut self) -> StorageResult<()> {
        self.backend.close()
    }

    /// Builds a router over an arbitrary backend (for testing failover)
    #[cfg(test)]
    pub(crate) fn with_backend(
        backend: Box<dyn StorageBackend>,
        output_dir: &Path,
        date: &str,
    ) -> Self {
        Self {
            backend,
            output_dir: output_dir.to_path_buf(),
            date: date.to_string(),
        }
    }
}
