//! Partitioned row storage.
//!
//! A store is a set of named partitions, each an ordered list of string rows.
//! Positions are 0-based and dense: deleting row `n` shifts every later row
//! down by one. [`Table`] is the seam repos and the archive engine are written
//! against; [`SqlTable`] implements it on top of one libSQL database.

use std::future::Future;

use crate::CareDb;
use crate::error::DatabaseError;
use crate::helpers::{from_sql_int, pad_row, to_sql_int};
use crate::retry::with_read_retry;

/// One row of string cells.
pub type Row = Vec<String>;

/// Positional access to one partition.
pub trait Table: Sync {
    fn name(&self) -> &str;

    fn read_all(&self) -> impl Future<Output = Result<Vec<Row>, DatabaseError>> + Send;

    /// Read `count` rows starting at `row_start`, keeping only
    /// `col_count` cells starting at `col_start`. Short rows are padded.
    fn read_range(
        &self,
        row_start: usize,
        count: usize,
        col_start: usize,
        col_count: usize,
    ) -> impl Future<Output = Result<Vec<Row>, DatabaseError>> + Send;

    fn row_count(&self) -> impl Future<Output = Result<usize, DatabaseError>> + Send;

    /// Append rows at the end, creating the partition if needed.
    fn append_rows(&self, rows: &[Row])
    -> impl Future<Output = Result<(), DatabaseError>> + Send;

    /// Replace every row in a single transaction.
    fn overwrite_all(
        &self,
        rows: &[Row],
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;

    /// Replace the row at `offset`. `NoResult` if out of bounds.
    fn update_row(
        &self,
        offset: usize,
        row: &Row,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send;

    /// Remove the row at `offset`. `NoResult` if out of bounds.
    fn delete_row(&self, offset: usize)
    -> impl Future<Output = Result<(), DatabaseError>> + Send;

    /// Drop every row at position `len` or later.
    fn truncate(&self, len: usize) -> impl Future<Output = Result<(), DatabaseError>> + Send;
}

/// A partition of a [`CareDb`], stored in the `partition_rows` table.
pub struct SqlTable<'a> {
    db: &'a CareDb,
    name: String,
}

impl<'a> SqlTable<'a> {
    pub(crate) fn new(db: &'a CareDb, name: &str) -> Self {
        Self {
            db,
            name: name.to_string(),
        }
    }

    async fn select_rows(&self, limit: i64, offset: i64) -> Result<Vec<Row>, DatabaseError> {
        let mut rows = self
            .db
            .conn()
            .query(
                "SELECT cells FROM partition_rows WHERE partition = ?1
                 ORDER BY seq LIMIT ?2 OFFSET ?3",
                libsql::params![self.name.as_str(), limit, offset],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(decode_cells(&row.get::<String>(0)?)?);
        }
        Ok(out)
    }

    async fn count_rows(&self) -> Result<usize, DatabaseError> {
        let mut rows = self
            .db
            .conn()
            .query(
                "SELECT COUNT(*) FROM partition_rows WHERE partition = ?1",
                libsql::params![self.name.as_str()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        from_sql_int(row.get::<i64>(0)?)
    }

    async fn append_locked(&self, rows: &[Row]) -> Result<(), DatabaseError> {
        let _guard = self.db.write_lock().await;
        let tx = self.db.conn().transaction().await?;
        tx.execute(
            "INSERT OR IGNORE INTO partitions (name) VALUES (?1)",
            libsql::params![self.name.as_str()],
        )
        .await?;
        let mut next = tx
            .query(
                "SELECT COALESCE(MAX(seq), -1) + 1 FROM partition_rows WHERE partition = ?1",
                libsql::params![self.name.as_str()],
            )
            .await?;
        let mut seq = next
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)?
            .get::<i64>(0)?;
        for row in rows {
            tx.execute(
                "INSERT INTO partition_rows (partition, seq, cells) VALUES (?1, ?2, ?3)",
                libsql::params![self.name.as_str(), seq, encode_cells(row)?],
            )
            .await?;
            seq += 1;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn overwrite_locked(&self, rows: &[Row]) -> Result<(), DatabaseError> {
        let _guard = self.db.write_lock().await;
        let tx = self.db.conn().transaction().await?;
        tx.execute(
            "INSERT OR IGNORE INTO partitions (name) VALUES (?1)",
            libsql::params![self.name.as_str()],
        )
        .await?;
        tx.execute(
            "DELETE FROM partition_rows WHERE partition = ?1",
            libsql::params![self.name.as_str()],
        )
        .await?;
        for (seq, row) in rows.iter().enumerate() {
            tx.execute(
                "INSERT INTO partition_rows (partition, seq, cells) VALUES (?1, ?2, ?3)",
                libsql::params![self.name.as_str(), to_sql_int(seq)?, encode_cells(row)?],
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_locked(&self, offset: usize, row: &Row) -> Result<(), DatabaseError> {
        let _guard = self.db.write_lock().await;
        let changed = self
            .db
            .conn()
            .execute(
                "UPDATE partition_rows SET cells = ?1
                 WHERE partition = ?2 AND seq = (
                     SELECT seq FROM partition_rows WHERE partition = ?2
                     ORDER BY seq LIMIT 1 OFFSET ?3
                 )",
                libsql::params![encode_cells(row)?, self.name.as_str(), to_sql_int(offset)?],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    async fn delete_locked(&self, offset: usize) -> Result<(), DatabaseError> {
        let _guard = self.db.write_lock().await;
        let changed = self
            .db
            .conn()
            .execute(
                "DELETE FROM partition_rows
                 WHERE partition = ?1 AND seq = (
                     SELECT seq FROM partition_rows WHERE partition = ?1
                     ORDER BY seq LIMIT 1 OFFSET ?2
                 )",
                libsql::params![self.name.as_str(), to_sql_int(offset)?],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    async fn truncate_locked(&self, len: usize) -> Result<(), DatabaseError> {
        let _guard = self.db.write_lock().await;
        self.db
            .conn()
            .execute(
                "DELETE FROM partition_rows
                 WHERE partition = ?1 AND seq >= (
                     SELECT seq FROM partition_rows WHERE partition = ?1
                     ORDER BY seq LIMIT 1 OFFSET ?2
                 )",
                libsql::params![self.name.as_str(), to_sql_int(len)?],
            )
            .await?;
        Ok(())
    }
}

impl Table for SqlTable<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> Result<Vec<Row>, DatabaseError> {
        with_read_retry(self.db.retry(), "read_all", move || {
            self.db.bounded(self.select_rows(-1, 0))
        })
        .await
    }

    async fn read_range(
        &self,
        row_start: usize,
        count: usize,
        col_start: usize,
        col_count: usize,
    ) -> Result<Vec<Row>, DatabaseError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let limit = to_sql_int(count)?;
        let offset = to_sql_int(row_start)?;
        let rows = with_read_retry(self.db.retry(), "read_range", move || {
            self.db.bounded(self.select_rows(limit, offset))
        })
        .await?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                pad_row(&mut row, col_start + col_count);
                row.drain(col_start..col_start + col_count).collect()
            })
            .collect())
    }

    async fn row_count(&self) -> Result<usize, DatabaseError> {
        with_read_retry(self.db.retry(), "row_count", move || {
            self.db.bounded(self.count_rows())
        })
        .await
    }

    async fn append_rows(&self, rows: &[Row]) -> Result<(), DatabaseError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.db.bounded(self.append_locked(rows)).await
    }

    async fn overwrite_all(&self, rows: &[Row]) -> Result<(), DatabaseError> {
        self.db.bounded(self.overwrite_locked(rows)).await
    }

    async fn update_row(&self, offset: usize, row: &Row) -> Result<(), DatabaseError> {
        self.db.bounded(self.update_locked(offset, row)).await
    }

    async fn delete_row(&self, offset: usize) -> Result<(), DatabaseError> {
        self.db.bounded(self.delete_locked(offset)).await
    }

    async fn truncate(&self, len: usize) -> Result<(), DatabaseError> {
        self.db.bounded(self.truncate_locked(len)).await
    }
}

fn encode_cells(row: &Row) -> Result<String, DatabaseError> {
    serde_json::to_string(row).map_err(|e| DatabaseError::Query(format!("encode row: {e}")))
}

fn decode_cells(raw: &str) -> Result<Row, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::Query(format!("decode row: {e}")))
}
