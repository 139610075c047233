//! Storage backend contract and error types

use crate::record::JobRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying engine could not be reached or created
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A batch could not be persisted
    #[error("batch write failed: {0}")]
    WriteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    /// The operation is outside the backend's capabilities
    #[error("{op} is not supported by the {backend} backend")]
    Unsupported {
        op: &'static str,
        backend: &'static str,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Uniform contract over the two storage engines.
///
/// The router fails over between implementations without the caller
/// knowing which one is active, so every write-path operation must behave
/// identically from the outside: `initialize` is idempotent, `write_batch`
/// persists all records or fails as a unit, `close` may be called any
/// number of times.
pub trait StorageBackend {
    /// Short engine name for log lines
    fn name(&self) -> &'static str;

    /// Creates the schema or file (with headers) if absent
    fn initialize(&mut self) -> StorageResult<()>;

    /// Appends all given records, returning the count written
    fn write_batch(&mut self, records: &[JobRecord]) -> StorageResult<usize>;

    /// Reads back the stored rows, oldest first, optionally limited to a
    /// prefix
    fn read(&mut self, limit: Option<usize>) -> StorageResult<Vec<JobRecord>>;

    /// Rewrites the province of every record located in the given city.
    /// Relational only.
    fn update_province(&mut self, city: &str, province: &str) -> StorageResult<usize>;

    /// Deletes every record of a category. Relational only.
    fn delete_category(&mut self, category: &str) -> StorageResult<usize>;

    /// Releases the underlying connection or file handle
    fn close(&mut self) -> StorageResult<()>;
}
