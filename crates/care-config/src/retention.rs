//! Retention windows and batch sizes for archival and purge jobs.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_archive_after_days() -> i64 {
    180
}

const fn default_archive_retention_years() -> i32 {
    5
}

const fn default_trash_retention_days() -> i64 {
    30
}

const fn default_audit_retention_days() -> i64 {
    365
}

const fn default_archive_batch_size() -> usize {
    1000
}

const fn default_history_chunk_size() -> usize {
    3000
}

const fn default_export_chunk_size() -> usize {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Records older than this many days are moved to an archive partition.
    #[serde(default = "default_archive_after_days")]
    pub archive_after_days: i64,

    /// Archive partitions older than this many years are deleted.
    #[serde(default = "default_archive_retention_years")]
    pub archive_retention_years: i32,

    /// Trash rows are purged after this many days.
    #[serde(default = "default_trash_retention_days")]
    pub trash_retention_days: i64,

    /// Audit events expire this many days after they are written.
    #[serde(default = "default_audit_retention_days")]
    pub audit_retention_days: i64,

    /// Rows appended to an archive per write.
    #[serde(default = "default_archive_batch_size")]
    pub archive_batch_size: usize,

    /// Rows read per chunk when scanning incident history backward.
    #[serde(default = "default_history_chunk_size")]
    pub history_chunk_size: usize,

    /// Rows read per chunk when exporting incident history.
    #[serde(default = "default_export_chunk_size")]
    pub export_chunk_size: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            archive_after_days: default_archive_after_days(),
            archive_retention_years: default_archive_retention_years(),
            trash_retention_days: default_trash_retention_days(),
            audit_retention_days: default_audit_retention_days(),
            archive_batch_size: default_archive_batch_size(),
            history_chunk_size: default_history_chunk_size(),
            export_chunk_size: default_export_chunk_size(),
        }
    }
}

impl RetentionConfig {
    /// Reject values that would make a job loop forever or purge everything.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("retention.archive_after_days", self.archive_after_days),
            ("retention.trash_retention_days", self.trash_retention_days),
            ("retention.audit_retention_days", self.audit_retention_days),
            (
                "retention.archive_retention_years",
                i64::from(self.archive_retention_years),
            ),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::OutOfRange {
                    field: field.to_string(),
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let sizes = [
            ("retention.archive_batch_size", self.archive_batch_size),
            ("retention.history_chunk_size", self.history_chunk_size),
            ("retention.export_chunk_size", self.export_chunk_size),
        ];
        for (field, value) in sizes {
            if value == 0 {
                return Err(ConfigError::OutOfRange {
                    field: field.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
