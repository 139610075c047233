//! Storage layer for persisting job records
//!
//! Two engines share one write-oriented contract: a SQLite database and a
//! delimited CSV file. The router selects one at startup and fails over
//! when the relational engine is down, so the crawl loop never needs to
//! know which store is active.

mod csv;
mod router;
mod sqlite;
mod traits;

pub use csv::CsvBackend;
pub use router::StorageRouter;
pub use sqlite::SqliteBackend;
pub use traits::{StorageBackend, StorageError, StorageResult};
