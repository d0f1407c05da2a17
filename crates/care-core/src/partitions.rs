//! Partition names and fixed column layouts.
//!
//! Column order is part of the persisted contract. New columns are only ever
//! appended; existing positions never move.

/// Live support-record partition in a records store.
pub const RECORDS_LIVE: &str = "records";
/// Trash partition in a records store.
pub const RECORDS_TRASH: &str = "records_trash";
/// Prefix of year-keyed archive partitions in a records store.
pub const RECORDS_ARCHIVE_PREFIX: &str = "records_archive_";

/// Live incident partition in an incidents store.
pub const INCIDENTS_LIVE: &str = "incidents";
/// Trash partition in an incidents store.
pub const INCIDENTS_TRASH: &str = "incidents_trash";

/// Office → store mapping in the master store.
pub const OFFICE_MAPPING: &str = "office_mapping";
/// Staff directory in the master store.
pub const STAFF: &str = "staff";
/// Audit log in the master store.
pub const AUDIT_LOG: &str = "audit_log";

pub const RECORD_COLUMNS: usize = 15;
pub const INCIDENT_COLUMNS: usize = 16;
pub const AUDIT_COLUMNS: usize = 17;
/// `deleted_at` and `deleted_by` prepended to a trashed row.
pub const TRASH_PREFIX_COLUMNS: usize = 2;

pub mod record_col {
    pub const CREATED_AT: usize = 0;
    pub const OCCURRED_AT: usize = 1;
    pub const USER: usize = 2;
    pub const RECORDER: usize = 3;
    pub const ITEM: usize = 4;
    pub const DETAIL_1: usize = 5;
    pub const DETAIL_2: usize = 6;
    pub const TEMP: usize = 7;
    pub const BP_HIGH: usize = 8;
    pub const BP_LOW: usize = 9;
    pub const PULSE: usize = 10;
    pub const SPO2: usize = 11;
    pub const WEIGHT: usize = 12;
    pub const CONTENT: usize = 13;
    pub const SEARCH_INDEX: usize = 14;
}

pub mod incident_col {
    pub const ID: usize = 0;
    pub const CREATED_AT: usize = 1;
    pub const OCCURRED_AT: usize = 2;
    pub const RECORDER: usize = 3;
    pub const SUBJECT_USER: usize = 4;
    pub const TYPE: usize = 5;
    pub const PLACE: usize = 6;
    pub const SITUATION: usize = 7;
    pub const CAUSE: usize = 8;
    pub const RESPONSE: usize = 9;
    pub const PREVENTION: usize = 10;
    pub const STATUS: usize = 11;
    pub const APPROVER: usize = 12;
    pub const APPROVED_AT: usize = 13;
    pub const RETURN_REASON: usize = 14;
    pub const RETURNED_AT: usize = 15;
}

pub mod audit_col {
    pub const TIMESTAMP: usize = 0;
    pub const SCHEMA_VERSION: usize = 1;
    pub const EXECUTOR: usize = 2;
    pub const ROLE: usize = 3;
    pub const OFFICES_AUTHORIZED: usize = 4;
    pub const OFFICE_SELECTED: usize = 5;
    pub const ACTION: usize = 6;
    pub const TARGET_TYPE: usize = 7;
    pub const TARGET_ID: usize = 8;
    pub const TARGET_DATE: usize = 9;
    pub const STATUS: usize = 10;
    pub const MESSAGE: usize = 11;
    pub const DETAIL: usize = 12;
    pub const CLIENT_INFO: usize = 13;
    pub const REQUEST_ID: usize = 14;
    pub const EXPIRES_AT: usize = 15;
    pub const SEARCH_INDEX: usize = 16;
}

/// Name of the archive partition holding rows for `year`.
#[must_use]
pub fn archive_partition_name(year: i32) -> String {
    format!("{RECORDS_ARCHIVE_PREFIX}{year}")
}

/// Year encoded in an archive partition name, or `None` for any other partition.
#[must_use]
pub fn archive_year(name: &str) -> Option<i32> {
    let suffix = name.strip_prefix(RECORDS_ARCHIVE_PREFIX)?;
    if suffix.len() != 4 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Record partitions in retrieval order: live first, then archives newest year first.
#[must_use]
pub fn record_scan_order(partition_names: &[String]) -> Vec<String> {
    let mut archives: Vec<(i32, &String)> = partition_names
        .iter()
        .filter_map(|name| archive_year(name).map(|year| (year, name)))
        .collect();
    archives.sort_by(|a, b| b.0.cmp(&a.0));

    let mut order = Vec::with_capacity(archives.len() + 1);
    order.push(RECORDS_LIVE.to_string());
    order.extend(archives.into_iter().map(|(_, name)| name.clone()));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn archive_name_round_trips_year() {
        let name = archive_partition_name(2024);
        assert_eq!(name, "records_archive_2024");
        assert_eq!(archive_year(&name), Some(2024));
    }

    #[test]
    fn non_archive_names_have_no_year() {
        assert_eq!(archive_year(RECORDS_LIVE), None);
        assert_eq!(archive_year(RECORDS_TRASH), None);
        assert_eq!(archive_year("records_archive_24"), None);
        assert_eq!(archive_year("records_archive_20x4"), None);
    }

    #[test]
    fn scan_order_is_live_then_newest_archive() {
        let names = vec![
            "records_archive_2022".to_string(),
            RECORDS_TRASH.to_string(),
            "records_archive_2024".to_string(),
            RECORDS_LIVE.to_string(),
            "records_archive_2023".to_string(),
        ];
        assert_eq!(
            record_scan_order(&names),
            vec![
                "records",
                "records_archive_2024",
                "records_archive_2023",
                "records_archive_2022",
            ]
        );
    }

    #[test]
    fn scan_order_includes_live_even_when_absent() {
        assert_eq!(record_scan_order(&[]), vec!["records"]);
    }
}
