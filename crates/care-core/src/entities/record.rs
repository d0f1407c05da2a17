use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RecordItem;

/// Vital signs captured with a support record. Cells are free-form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Vitals {
    pub temp: String,
    pub bp_high: String,
    pub bp_low: String,
    pub pulse: String,
    pub spo2: String,
    pub weight: String,
}

/// Caller-supplied content for a new or edited support record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordDraft {
    pub occurred_at: DateTime<Utc>,
    pub recorder_name: String,
    pub item: RecordItem,
    #[serde(default)]
    pub detail1: String,
    #[serde(default)]
    pub detail2: String,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub content: String,
}

/// One daily support record for one user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SupportRecord {
    pub created_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
    pub user_name: String,
    pub recorder_name: String,
    pub item: RecordItem,
    pub detail1: String,
    pub detail2: String,
    pub vitals: Vitals,
    pub content: String,
    pub search_index: String,
}

impl SupportRecord {
    /// Build the record written for `user_name` from a draft.
    #[must_use]
    pub fn from_draft(draft: &RecordDraft, user_name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            occurred_at: draft.occurred_at,
            user_name: user_name.to_string(),
            recorder_name: draft.recorder_name.clone(),
            item: draft.item,
            detail1: draft.detail1.clone(),
            detail2: draft.detail2.clone(),
            vitals: draft.vitals.clone(),
            content: draft.content.clone(),
            search_index: search_index(
                draft.occurred_at,
                user_name,
                draft.item,
                &draft.content,
                &draft.detail1,
            ),
        }
    }

    /// Apply an edit. The user and creation stamp never change.
    #[must_use]
    pub fn edited(&self, draft: &RecordDraft) -> Self {
        Self::from_draft(draft, &self.user_name, self.created_at)
    }
}

/// Derived substring-search column: date, user, item, content, detail1.
#[must_use]
pub fn search_index(
    occurred_at: DateTime<Utc>,
    user_name: &str,
    item: RecordItem,
    content: &str,
    detail1: &str,
) -> String {
    [
        occurred_at.format("%Y/%m/%d").to_string().as_str(),
        user_name,
        item.as_str(),
        content,
        detail1,
    ]
    .join(" ")
}

/// Volatile positional locator of a record.
///
/// `created_at` and `user_name` are re-checked against the row at `offset`
/// before any mutation so that a shifted row is detected instead of
/// overwritten. Rows from one fan-out share `created_at`, so the user is
/// what tells siblings apart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordRef {
    pub partition: String,
    pub offset: usize,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}

/// A record together with where it currently lives.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordEntry {
    pub locator: RecordRef,
    pub record: SupportRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> RecordDraft {
        RecordDraft {
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap(),
            recorder_name: "佐藤".into(),
            item: RecordItem::Meal,
            detail1: "完食".into(),
            detail2: String::new(),
            vitals: Vitals::default(),
            content: "昼食を完食".into(),
        }
    }

    #[test]
    fn search_index_joins_date_user_item_content_detail() {
        let record = SupportRecord::from_draft(&draft(), "田中", Utc::now());
        assert_eq!(record.search_index, "2026/03/04 田中 食事 昼食を完食 完食");
    }

    #[test]
    fn edit_keeps_user_and_creation_stamp() {
        let created = Utc.with_ymd_and_hms(2026, 3, 4, 10, 0, 0).unwrap();
        let record = SupportRecord::from_draft(&draft(), "田中", created);

        let mut change = draft();
        change.item = RecordItem::Medication;
        change.content = "服薬済み".into();
        let edited = record.edited(&change);

        assert_eq!(edited.user_name, "田中");
        assert_eq!(edited.created_at, created);
        assert_eq!(edited.search_index, "2026/03/04 田中 服薬 服薬済み 完食");
    }
}
