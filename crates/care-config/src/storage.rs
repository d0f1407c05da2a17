//! Local libSQL store locations and call limits.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_master_store() -> String {
    String::from("master")
}

const fn default_timeout_ms() -> u64 {
    5000
}

const fn default_read_retry_attempts() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding one database file per store. Empty keeps every
    /// store in memory.
    #[serde(default)]
    pub data_dir: String,

    /// Store id of the master store (office mapping, staff, audit log).
    #[serde(default = "default_master_store")]
    pub master_store: String,

    /// Upper bound on a single storage call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Attempts for idempotent reads, including the first one.
    #[serde(default = "default_read_retry_attempts")]
    pub read_retry_attempts: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            master_store: default_master_store(),
            timeout_ms: default_timeout_ms(),
            read_retry_attempts: default_read_retry_attempts(),
        }
    }
}

impl StorageConfig {
    /// Whether stores are backed by files rather than memory.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        !self.data_dir.is_empty()
    }

    /// Path of the database file for `store_id`, or `None` for in-memory mode.
    #[must_use]
    pub fn store_path(&self, store_id: &str) -> Option<PathBuf> {
        if self.is_persistent() {
            Some(PathBuf::from(&self.data_dir).join(format!("{store_id}.db")))
        } else {
            None
        }
    }
}
