//! CSV storage backend
//!
//! Flat-file fallback store. One UTF-8 file per crawl date, header row
//! first, appended batch by batch. Updates and deletes are not supported;
//! reads scan the whole file.

use crate::record::{JobRecord, FIELD_NAMES};
use crate::storage::traits::{StorageBackend, StorageError, StorageResult};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// File-based backend writing delimited rows
pub struct CsvBackend {
    path: PathBuf,
}

impl CsvBackend {
    /// Creates a backend for `job_info_<date>.csv` under the output
    /// directory
    pub fn new(output_dir: &Path, date: &str) -> Self {
        Self {
            path: output_dir.join(format!("job_info_{date}.csv")),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for CsvBackend {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn initialize(&mut self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("create {}: {e}", parent.display()))
            })?;
        }

        if !self.path.exists() {
            let file = File::create(&self.path).map_err(|e| {
                StorageError::Unavailable(format!("create {}: {e}", self.path.display()))
            })?;
            let mut writer = csv::Writer::from_writer(file);
            writer
                .write_record(FIELD_NAMES)
                .map_err(|e| StorageError::Unavailable(format!("write header: {e}")))?;
            writer
                .flush()
                .map_err(|e| StorageError::Unavailable(format!("flush header: {e}")))?;
        }

        Ok(())
    }

    fn write_batch(&mut self, records: &[JobRecord]) -> StorageResult<usize> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StorageError::WriteFailed(format!("open {}: {e}", self.path.display()))
            })?;

        // Header already written by initialize
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        Ok(records.len())
    }

    fn read(&mut self, limit: Option<usize>) -> StorageResult<Vec<JobRecord>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            StorageError::ReadFailed(format!("open {}: {e}", self.path.display()))
        })?;

        let mut records = Vec::new();
        for result in reader.deserialize::<JobRecord>() {
            if limit.is_some_and(|n| records.len() >= n) {
                break;
            }
            let record = result.map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            records.push(record);
        }

        Ok(records)
    }

    fn update_province(&mut self, _city: &str, _province: &str) -> StorageResult<usize> {
        Err(StorageError::Unsupported {
            op: "update",
            backend: self.name(),
        })
    }

    fn delete_category(&mut self, _category: &str) -> StorageResult<usize> {
        Err(StorageError::Unsupported {
            op: "delete",
            backend: self.name(),
        })
    }

    fn close(&mut self) -> StorageResult<()> {
        // Handles are opened per call; nothing to release.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::sample_record;
    use tempfile::TempDir;

    fn open_backend(dir: &TempDir) -> CsvBackend {
        let mut backend = CsvBackend::new(dir.path(), "2023-12-22");
        backend.initialize().unwrap();
        backend
    }

    #[test]
    fn test_initialize_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);
        backend.initialize().unwrap();

        let content = std::fs::read_to_string(backend.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        let header = content.lines().next().unwrap();
        assert!(header.starts_with("category,sub_category,job_title"));
        assert!(header.ends_with("create_time"));
    }

    #[test]
    fn test_write_and_read_roundtrip_preserves_order_and_values() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);

        let records = vec![
            sample_record("技术", "后端开发", "Rust工程师"),
            sample_record("技术", "前端开发", "前端工程师"),
            sample_record("产品", "产品经理", "高级产品经理"),
        ];
        let written = backend.write_batch(&records).unwrap();
        assert_eq!(written, 3);

        let read = backend.read(None).unwrap();
        assert_eq!(read, records);
    }

    #[test]
    fn test_fields_with_commas_survive_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);

        let mut record = sample_record("技术", "后端开发", "Rust工程师");
        record.job_skills = "Rust,Tokio,SQL".to_string();
        record.job_welfare = "五险一金，带薪年假".to_string();
        backend.write_batch(std::slice::from_ref(&record)).unwrap();

        let read = backend.read(None).unwrap();
        assert_eq!(read, vec![record]);
    }

    #[test]
    fn test_read_prefix() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);
        backend
            .write_batch(&[
                sample_record("技术", "后端开发", "Rust工程师"),
                sample_record("技术", "后端开发", "Go工程师"),
            ])
            .unwrap();

        let read = backend.read(Some(1)).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].job_title, "Rust工程师");
    }

    #[test]
    fn test_appends_across_batches() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);
        backend
            .write_batch(&[sample_record("技术", "后端开发", "Rust工程师")])
            .unwrap();
        backend
            .write_batch(&[sample_record("产品", "产品经理", "产品经理")])
            .unwrap();

        assert_eq!(backend.read(None).unwrap().len(), 2);
    }

    #[test]
    fn test_update_and_delete_are_unsupported() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);

        assert!(matches!(
            backend.update_province("杭州", "浙江"),
            Err(StorageError::Unsupported { op: "update", .. })
        ));
        assert!(matches!(
            backend.delete_category("技术"),
            Err(StorageError::Unsupported { op: "delete", .. })
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut backend = open_backend(&dir);
        backend.close().unwrap();
        backend.close().unwrap();
    }

    #[test]
    fn test_write_without_initialize_fails() {
        let dir = TempDir::new().unwrap();
        let mut backend = CsvBackend::new(dir.path(), "2023-12-22");
        let result = backend.write_batch(&[sample_record("技术", "后端开发", "Rust工程师")]);
        assert!(matches!(result, Err(StorageError::WriteFailed(_))));
    }
}
