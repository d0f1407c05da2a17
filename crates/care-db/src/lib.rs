//! # care-db
//!
//! libSQL storage and service layer for the care record store.
//!
//! Each office owns a records store and, optionally, an incidents store; a
//! shared master store holds the office directory, the staff directory and
//! the audit log. Every store is one libSQL database holding named
//! partitions of string rows (see [`storage`]).
//!
//! All public operations live on [`service::CareService`], split across
//! `impl CareService` blocks in [`repos`], [`archive`] and [`tenant`].

pub mod archive;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod storage;
pub mod tenant;
mod test_support;

use std::future::Future;
use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;
use retry::RetryConfig;
use storage::SqlTable;
use tokio::sync::{Mutex, MutexGuard};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to one store.
///
/// Wraps a libSQL database and connection. Writes are serialized through a
/// per-store lock so multi-statement transactions never interleave on the
/// shared connection.
pub struct CareDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    write_lock: Mutex<()>,
    timeout: Duration,
    retry: RetryConfig,
}

impl CareDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let care_db = Self {
            db,
            conn,
            write_lock: Mutex::new(()),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        };
        care_db.run_migrations().await?;
        Ok(care_db)
    }

    /// Override the per-call timeout and read retry policy.
    #[must_use]
    pub fn with_limits(mut self, timeout: Duration, retry: RetryConfig) -> Self {
        self.timeout = timeout;
        self.retry = retry;
        self
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Open a partition by name. Nothing is created until the first write.
    #[must_use]
    pub fn table(&self, name: &str) -> SqlTable<'_> {
        SqlTable::new(self, name)
    }

    /// Names of every partition that has been written to, sorted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_partition_names(&self) -> Result<Vec<String>, DatabaseError> {
        retry::with_read_retry(&self.retry, "list_partition_names", move || {
            self.bounded(async move {
                let mut rows = self
                    .conn
                    .query("SELECT name FROM partitions ORDER BY name", ())
                    .await?;
                let mut names = Vec::new();
                while let Some(row) = rows.next().await? {
                    names.push(row.get::<String>(0)?);
                }
                Ok(names)
            })
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn partition_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        retry::with_read_retry(&self.retry, "partition_exists", move || {
            self.bounded(async move {
                let mut rows = self
                    .conn
                    .query(
                        "SELECT 1 FROM partitions WHERE name = ?1",
                        libsql::params![name],
                    )
                    .await?;
                Ok(rows.next().await?.is_some())
            })
        })
        .await
    }

    /// Drop a partition and all of its rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the partition does not exist.
    pub async fn delete_partition(&self, name: &str) -> Result<(), DatabaseError> {
        self.bounded(async {
            let _guard = self.write_lock().await;
            let tx = self.conn.transaction().await?;
            tx.execute(
                "DELETE FROM partition_rows WHERE partition = ?1",
                libsql::params![name],
            )
            .await?;
            let removed = tx
                .execute(
                    "DELETE FROM partitions WHERE name = ?1",
                    libsql::params![name],
                )
                .await?;
            if removed == 0 {
                tx.rollback().await?;
                return Err(DatabaseError::NoResult);
            }
            tx.commit().await?;
            Ok(())
        })
        .await
    }

    pub(crate) async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub(crate) const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Run a storage call under the configured timeout.
    pub(crate) async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, DatabaseError>>,
    ) -> Result<T, DatabaseError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| DatabaseError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Table;

    /// Helper to create an in-memory database for testing.
    async fn test_db() -> CareDb {
        CareDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                (),
            )
            .await
            .unwrap();
        let mut tables = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            tables.push(row.get::<String>(0).unwrap());
        }
        assert!(tables.contains(&"partitions".to_string()));
        assert!(tables.contains(&"partition_rows".to_string()));
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        assert!(db.list_partition_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("office.db");
        let path = path.to_str().unwrap();
        {
            let db = CareDb::open_local(path).await.unwrap();
            db.table("records")
                .append_rows(&[vec!["x".to_string()]])
                .await
                .unwrap();
        }
        let db = CareDb::open_local(path).await.unwrap();
        assert_eq!(db.list_partition_names().await.unwrap(), vec!["records"]);
    }

    #[tokio::test]
    async fn delete_missing_partition_is_no_result() {
        let db = test_db().await;
        assert!(matches!(
            db.delete_partition("records_archive_2001").await,
            Err(DatabaseError::NoResult)
        ));
    }
}
