//! Integration tests for the storage layer
//!
//! These exercise the public storage API end-to-end: backend selection,
//! failover to CSV, round-trip fidelity, and the (documented) duplication
//! that a resumed crawl produces.

use jobspider::config::{BackendKind, StorageConfig};
use jobspider::record::JobRecord;
use jobspider::storage::{CsvBackend, SqliteBackend, StorageBackend, StorageError, StorageRouter};
use tempfile::TempDir;

const DATE: &str = "2024-01-15";

fn record(title: &str, location: &str) -> JobRecord {
    JobRecord {
        category: "互联网/AI".to_string(),
        sub_category: "后端开发".to_string(),
        job_title: title.to_string(),
        province: "北京".to_string(),
        job_location: location.to_string(),
        job_company: "示例科技".to_string(),
        job_industry: "互联网".to_string(),
        job_finance: "A轮".to_string(),
        job_scale: "100-499人".to_string(),
        job_welfare: "五险一金".to_string(),
        job_salary_range: "20-40K".to_string(),
        job_experience: "3-5年".to_string(),
        job_education: "本科".to_string(),
        job_skills: "Rust,SQL".to_string(),
        job_address: String::new(),
        job_desc: String::new(),
        create_time: DATE.to_string(),
    }
}

#[test]
fn router_prefers_sqlite_and_roundtrips() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::default();

    let mut router = StorageRouter::open(&config, dir.path(), DATE).unwrap();
    assert_eq!(router.backend_name(), "sqlite");

    let batch = vec![
        record("Rust工程师", "北京·海淀区"),
        record("Go工程师", "上海·浦东新区"),
    ];
    assert_eq!(router.save(&batch).unwrap(), 2);
    router.close().unwrap();

    // Reopen the database independently and verify the rows.
    let mut backend = SqliteBackend::new(dir.path().join(&config.database_file));
    backend.initialize().unwrap();
    assert_eq!(backend.read(None).unwrap(), batch);
}

#[test]
fn router_falls_back_to_csv_when_sqlite_cannot_open() {
    let dir = TempDir::new().unwrap();

    // The database path points below a regular file, so SQLite cannot
    // create it.
    std::fs::write(dir.path().join("occupied"), "").unwrap();
    let config = StorageConfig {
        database_file: "occupied/job_info.db".to_string(),
        ..StorageConfig::default()
    };

    let mut router = StorageRouter::open(&config, dir.path(), DATE).unwrap();
    assert_eq!(router.backend_name(), "csv");

    let batch = vec![record("Rust工程师", "北京·海淀区")];
    assert_eq!(router.save(&batch).unwrap(), 1);

    let content =
        std::fs::read_to_string(dir.path().join(format!("job_info_{DATE}.csv"))).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("category,sub_category,job_title,province,job_location"));
    assert!(header.ends_with("create_time"));
    assert!(lines.next().unwrap().contains("Rust工程师"));
}

#[test]
fn csv_roundtrip_preserves_values_and_order() {
    let dir = TempDir::new().unwrap();
    let mut backend = CsvBackend::new(dir.path(), DATE);
    backend.initialize().unwrap();

    let batch: Vec<JobRecord> = (0..5)
        .map(|i| record(&format!("工程师{i}"), "深圳·南山区"))
        .collect();
    assert_eq!(backend.write_batch(&batch).unwrap(), 5);

    let read = backend.read(None).unwrap();
    assert_eq!(read, batch);
}

#[test]
fn csv_backend_rejects_update_and_delete() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: BackendKind::Csv,
        ..StorageConfig::default()
    };
    let router = StorageRouter::open(&config, dir.path(), DATE).unwrap();
    assert_eq!(router.backend_name(), "csv");

    let mut backend = CsvBackend::new(dir.path(), DATE);
    assert!(matches!(
        backend.update_province("杭州", "浙江"),
        Err(StorageError::Unsupported { .. })
    ));
    assert!(matches!(
        backend.delete_category("互联网/AI"),
        Err(StorageError::Unsupported { .. })
    ));
}

#[test]
fn replayed_batch_duplicates_records() {
    // A resumed crawl re-attempts the saved category; the storage layer
    // performs no deduplication, so the same batch lands twice.
    let dir = TempDir::new().unwrap();
    let mut backend = CsvBackend::new(dir.path(), DATE);
    backend.initialize().unwrap();

    let batch = vec![record("Rust工程师", "北京·海淀区")];
    backend.write_batch(&batch).unwrap();
    backend.write_batch(&batch).unwrap();

    let read = backend.read(None).unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0], read[1]);
}
