//! SQLite storage backend

use crate::record::JobRecord;
use crate::storage::traits::{StorageBackend, StorageError, StorageResult};
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// SQL schema for the job table, columns in record order plus the
/// surrogate id
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS job_info (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    sub_category TEXT NOT NULL,
    job_title TEXT NOT NULL,
    province TEXT,
    job_location TEXT NOT NULL,
    job_company TEXT NOT NULL,
    job_industry TEXT,
    job_finance TEXT,
    job_scale TEXT,
    job_welfare TEXT,
    job_salary_range TEXT NOT NULL,
    job_experience TEXT NOT NULL,
    job_education TEXT NOT NULL,
    job_skills TEXT,
    job_address TEXT,
    job_desc TEXT,
    create_time TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_job_info_category ON job_info(category);
CREATE INDEX IF NOT EXISTS idx_job_info_job_title ON job_info(job_title);
CREATE INDEX IF NOT EXISTS idx_job_info_job_company ON job_info(job_company);
";

const INSERT_SQL: &str = "
INSERT INTO job_info (
    category, sub_category, job_title, province, job_location,
    job_company, job_industry, job_finance, job_scale, job_welfare,
    job_salary_range, job_experience, job_education, job_skills,
    job_address, job_desc, create_time
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
";

const SELECT_SQL: &str = "
SELECT category, sub_category, job_title, province, job_location,
       job_company, job_industry, job_finance, job_scale, job_welfare,
       job_salary_range, job_experience, job_education, job_skills,
       job_address, job_desc, create_time
FROM job_info ORDER BY id
";

/// Relational backend over a SQLite database file
pub struct SqliteBackend {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteBackend {
    /// Creates a backend for the given database file. The connection is
    /// opened by `initialize`.
    pub fn new(path: PathBuf) -> Self {
        Self { path, conn: None }
    }

    /// Creates an in-memory backend (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Some(conn),
        })
    }

    fn conn_mut(&mut self) -> StorageResult<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or_else(|| StorageError::Unavailable("sqlite backend is not open".to_string()))
    }
}

impl StorageBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn initialize(&mut self) -> StorageResult<()> {
        if self.conn.is_none() {
            let conn = Connection::open(&self.path).map_err(|e| {
                StorageError::Unavailable(format!("open {}: {e}", self.path.display()))
            })?;
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            self.conn = Some(conn);
        }

        self.conn_mut()?
            .execute_batch(SCHEMA_SQL)
            .map_err(|e| StorageError::Unavailable(format!("schema: {e}")))?;
        Ok(())
    }

    fn write_batch(&mut self, records: &[JobRecord]) -> StorageResult<usize> {
        let conn = self.conn_mut()?;

        // One transaction for the whole batch; a failed row rolls back
        // everything already staged.
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        {
            let mut stmt = tx
                .prepare(INSERT_SQL)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            for record in records {
                stmt.execute(params![
                    record.category,
                    record.sub_category,
                    record.job_title,
                    record.province,
                    record.job_location,
                    record.job_company,
                    record.job_industry,
                    record.job_finance,
                    record.job_scale,
                    record.job_welfare,
                    record.job_salary_range,
                    record.job_experience,
                    record.job_education,
                    record.job_skills,
                    record.job_address,
                    record.job_desc,
                    record.create_time,
                ])
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
            }
        }
        tx.commit()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        Ok(records.len())
    }

    fn read(&mut self, limit: Option<usize>) -> StorageResult<Vec<JobRecord>> {
        let sql = match limit {
            Some(n) => format!("{SELECT_SQL} LIMIT {n}"),
            None => SELECT_SQL.to_string(),
        };

        let conn = self.conn_mut()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(JobRecord {
                    category: row.get(0)?,
                    sub_category: row.get(1)?,
                    job_title: row.get(2)?,
                    province: row.get(3)?,
                    job_location: row.get(4)?,
                    job_company: row.get(5)?,
                    job_industry: row.get(6)?,
                    job_finance: row.get(7)?,
                    job_scale: row.get(8)?,
                    job_welfare: row.get(9)?,
                    job_salary_range: row.get(10)?,
                    job_experience: row.get(11)?,
                    job_education: row.get(12)?,
                    job_skills: row.get(13)?,
                    job_address: row.get(14)?,
                    job_desc: row.get(15)?,
                    create_time: row.get(16)?,
                })
            })
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        Ok(rows)
    }

    fn update_province(&mut self, city: &str, province: &str) -> StorageResult<usize> {
        let affected = self
            .conn_mut()?
            .execute(
                "UPDATE job_info SET province = ?1
                 WHERE job_location = ?2 OR job_location LIKE ?2 || '·%'",
                params![province, city],
            )
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(affected)
    }

    fn delete_category(&mut self, category: &str) -> StorageResult<usize> {
        let affected = self
            .conn_mut()?
            .execute(
                "DELETE FROM job_info WHERE category = ?1",
                params![category],
            )
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(affected)
    }

    fn close(&mut self) -> StorageResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| StorageError::Unavailable(format!("close: {e}")))?;
        }
        Ok(())
    }
}
