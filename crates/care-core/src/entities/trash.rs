use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{RecordRef, SupportRecord};
use crate::partitions::RECORDS_TRASH;

/// A soft-deleted row waiting in a trash partition.
///
/// `deleted_at` is `None` when the stored cell does not parse; such rows are
/// never purged automatically.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrashEntry<T> {
    pub offset: usize,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: String,
    pub item: T,
}

impl TrashEntry<SupportRecord> {
    /// Locator used to restore this record.
    #[must_use]
    pub fn locator(&self) -> RecordRef {
        RecordRef {
            partition: RECORDS_TRASH.to_string(),
            offset: self.offset,
            created_at: self.item.created_at,
            user_name: self.item.user_name.clone(),
        }
    }
}
