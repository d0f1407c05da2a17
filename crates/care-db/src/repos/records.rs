//! Support record repository.
//!
//! Records live in the live `records` partition and in year-keyed
//! `records_archive_<YYYY>` partitions. Retrieval scans live first, then
//! archives newest year first, each partition newest row first. A record is
//! addressed by a [`RecordRef`]: partition, offset and the creation stamp
//! that is re-checked before every mutation.

use chrono::{DateTime, Utc};

use care_auth::Session;
use care_core::audit_detail::{RecordSaveDetail, RowLocationDetail};
use care_core::entities::{RecordDraft, RecordEntry, RecordRef, SupportRecord, TrashEntry, Vitals};
use care_core::enums::{AuditAction, RecordItem, TargetType};
use care_core::pagination::ContinuationToken;
use care_core::partitions::{
    RECORD_COLUMNS, RECORDS_LIVE, RECORDS_TRASH, TRASH_PREFIX_COLUMNS, archive_year, record_col,
    record_scan_order,
};
use care_core::responses::RecordPage;

use crate::error::{DatabaseError, StoreError};
use crate::helpers::{cell, format_datetime, pad_row, parse_cell_datetime};
use crate::repos::audit::AuditDraft;
use crate::service::CareService;
use crate::storage::{Row, Table};

/// Filter and page window for [`CareService::get_records`].
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Exact `user_name` match.
    pub user: Option<String>,
    /// Inclusive lower bound on `occurred_at`.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `occurred_at`.
    pub end: Option<DateTime<Utc>>,
    /// Maximum number of matching records to return.
    pub limit: usize,
    pub continuation: Option<ContinuationToken>,
}

impl RecordQuery {
    fn matches(&self, row: &Row) -> Option<SupportRecord> {
        if let Some(user) = &self.user {
            if cell(row, record_col::USER) != user {
                return None;
            }
        }
        let record = row_to_record(row)?;
        let after_start = self.start.is_none_or(|start| record.occurred_at >= start);
        let before_end = self.end.is_none_or(|end| record.occurred_at <= end);
        (after_start && before_end).then_some(record)
    }
}

impl CareService {
    /// One page of records matching `query`.
    ///
    /// The continuation token names the partition where the page stopped and
    /// how many matches of that partition were already returned, so resuming
    /// yields exactly what a single larger call would have.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a token naming a partition that is not a
    /// record partition of this office, or whose offset cannot be resumed.
    pub async fn get_records(&self, office: &str, query: &RecordQuery) -> Result<RecordPage, StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let db = tenant.records();
        let order = record_scan_order(&db.list_partition_names().await?);

        let (first, mut skip) = match &query.continuation {
            Some(token) => {
                let idx = order
                    .iter()
                    .position(|name| *name == token.partition)
                    .ok_or_else(|| {
                        StoreError::validation(format!(
                            "continuation token names unknown partition '{}'",
                            token.partition
                        ))
                    })?;
                (idx, token.offset)
            }
            None => (0, 0),
        };

        let mut records = Vec::new();
        for name in &order[first..] {
            let window = skip
                .checked_add(query.limit - records.len())
                .ok_or_else(|| {
                    StoreError::validation(format!("continuation offset {skip} is out of range"))
                })?;
            let rows = db.table(name).read_all().await?;
            tracing::debug!(partition = %name, rows = rows.len(), skip, "scanning record partition");

            let mut matched = 0;
            for (offset, row) in rows.iter().enumerate().rev() {
                let Some(record) = query.matches(row) else {
                    continue;
                };
                if matched == window {
                    return Ok(RecordPage {
                        records,
                        has_more: true,
                        continuation: Some(ContinuationToken::new(name.clone(), window)),
                    });
                }
                if matched >= skip {
                    records.push(RecordEntry {
                        locator: RecordRef {
                            partition: name.clone(),
                            offset,
                            created_at: record.created_at,
                            user_name: record.user_name.clone(),
                        },
                        record,
                    });
                }
                matched += 1;
            }
            skip = 0;
        }

        Ok(RecordPage {
            records,
            has_more: false,
            continuation: None,
        })
    }

    /// Write one record per target user with a single append.
    ///
    /// Emits one `RECORD_SAVE` event whose target is the users joined by `,`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when no non-blank user is given, and
    /// `Authorization` when the session does not cover `office`.
    pub async fn add_records(
        &self,
        session: &Session,
        office: &str,
        draft: &RecordDraft,
        users: &[String],
    ) -> Result<Vec<SupportRecord>, StoreError> {
        let users: Vec<String> = users
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect();
        let audit = AuditDraft::new(AuditAction::RecordSave, TargetType::Record)
            .target(users.join(","))
            .target_date(Some(draft.occurred_at))
            .message(format!("saved {} record(s)", users.len()))
            .detail(&RecordSaveDetail {
                users: users.clone(),
                count: users.len(),
            });
        let result = self.add_records_inner(session, office, draft, &users).await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    async fn add_records_inner(
        &self,
        session: &Session,
        office: &str,
        draft: &RecordDraft,
        users: &[String],
    ) -> Result<Vec<SupportRecord>, StoreError> {
        if users.is_empty() {
            return Err(StoreError::validation("at least one target user is required"));
        }
        session.ensure_office(office)?;
        let tenant = self.resolve_tenant(office).await?;

        let now = Utc::now();
        let records: Vec<SupportRecord> = users
            .iter()
            .map(|user| SupportRecord::from_draft(draft, user, now))
            .collect();
        let rows: Vec<Row> = records.iter().map(record_to_row).collect();
        tenant.records().table(RECORDS_LIVE).append_rows(&rows).await?;
        Ok(records)
    }

    /// Rewrite a record in place. User and creation stamp are preserved.
    ///
    /// # Errors
    ///
    /// Returns `StaleReference` when the locator no longer points at the same
    /// record, and `Validation` for a partition that is not live or archive.
    pub async fn edit_record(
        &self,
        session: &Session,
        office: &str,
        locator: &RecordRef,
        draft: &RecordDraft,
    ) -> Result<SupportRecord, StoreError> {
        let audit = AuditDraft::new(AuditAction::RecordEdit, TargetType::Record)
            .target(format!("{}:{}", locator.partition, locator.offset))
            .target_date(Some(draft.occurred_at))
            .detail(&RowLocationDetail {
                partition: locator.partition.clone(),
                offset: locator.offset,
            });
        let result = async {
            session.ensure_office(office)?;
            ensure_record_partition(&locator.partition)?;
            let tenant = self.resolve_tenant(office).await?;
            let table = tenant.records().table(&locator.partition);
            let (current, _) = locate_record(&table, locator, 0).await?;

            let edited = current.edited(draft);
            table
                .update_row(locator.offset, &record_to_row(&edited))
                .await
                .map_err(|e| stale_on_missing(e, locator))?;
            Ok::<_, StoreError>(edited)
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// Move a record to `records_trash` as `[deleted_at, deleted_by, ...row]`.
    ///
    /// # Errors
    ///
    /// Returns `StaleReference` when the locator no longer points at the same
    /// record.
    pub async fn delete_record(
        &self,
        session: &Session,
        office: &str,
        locator: &RecordRef,
    ) -> Result<(), StoreError> {
        let audit = AuditDraft::new(AuditAction::RecordDelete, TargetType::Record)
            .target(format!("{}:{}", locator.partition, locator.offset))
            .detail(&RowLocationDetail {
                partition: locator.partition.clone(),
                offset: locator.offset,
            });
        let result = async {
            session.ensure_office(office)?;
            ensure_record_partition(&locator.partition)?;
            let tenant = self.resolve_tenant(office).await?;
            let table = tenant.records().table(&locator.partition);
            let (_, original) = locate_record(&table, locator, 0).await?;

            let trash = tenant.records().table(RECORDS_TRASH);
            let trash_len = trash.row_count().await?;
            let mut trashed = vec![format_datetime(Utc::now()), session.name.clone()];
            trashed.extend(original);
            trash.append_rows(&[trashed]).await?;

            if let Err(e) = table.delete_row(locator.offset).await {
                undo_append(&trash, trash_len).await;
                return Err(stale_on_missing(e, locator));
            }
            Ok::<_, StoreError>(())
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// Trashed records, most recently deleted first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the trash cannot be read.
    pub async fn list_record_trash(
        &self,
        office: &str,
    ) -> Result<Vec<TrashEntry<SupportRecord>>, StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let rows = tenant.records().table(RECORDS_TRASH).read_all().await?;
        Ok(rows
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(offset, row)| {
                let item = row_to_record(row.get(TRASH_PREFIX_COLUMNS..).unwrap_or(&[]))?;
                Some(TrashEntry {
                    offset,
                    deleted_at: parse_cell_datetime(cell(row, 0)),
                    deleted_by: cell(row, 1).to_string(),
                    item,
                })
            })
            .collect())
    }

    /// Append a trashed record back onto the live partition.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the locator is not a trash locator and
    /// `StaleReference` when the trash row has shifted.
    pub async fn restore_record(
        &self,
        session: &Session,
        office: &str,
        locator: &RecordRef,
    ) -> Result<SupportRecord, StoreError> {
        let audit = AuditDraft::new(AuditAction::RecordRestore, TargetType::Trash)
            .target(format!("{}:{}", locator.partition, locator.offset))
            .detail(&RowLocationDetail {
                partition: locator.partition.clone(),
                offset: locator.offset,
            });
        let result = async {
            session.ensure_office(office)?;
            if locator.partition != RECORDS_TRASH {
                return Err(StoreError::validation(format!(
                    "'{}' is not the record trash",
                    locator.partition
                )));
            }
            let tenant = self.resolve_tenant(office).await?;
            let trash = tenant.records().table(RECORDS_TRASH);
            let (record, original) = locate_record(&trash, locator, TRASH_PREFIX_COLUMNS).await?;

            let live = tenant.records().table(RECORDS_LIVE);
            let live_len = live.row_count().await?;
            live.append_rows(&[original]).await?;
            if let Err(e) = trash.delete_row(locator.offset).await {
                undo_append(&live, live_len).await;
                return Err(stale_on_missing(e, locator));
            }
            Ok::<_, StoreError>(record)
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }
}

fn ensure_record_partition(partition: &str) -> Result<(), StoreError> {
    if partition == RECORDS_LIVE || archive_year(partition).is_some() {
        Ok(())
    } else {
        Err(StoreError::validation(format!(
            "'{partition}' is not a record partition"
        )))
    }
}

/// Read the row at `locator.offset`, skipping `prefix` leading cells, and
/// check it still carries `locator.created_at` and `locator.user_name`.
///
/// Returns the parsed record and the record's own cells.
async fn locate_record<T: Table>(
    table: &T,
    locator: &RecordRef,
    prefix: usize,
) -> Result<(SupportRecord, Row), StoreError> {
    let mut rows = table
        .read_range(locator.offset, 1, prefix, RECORD_COLUMNS)
        .await?;
    let row = rows
        .pop()
        .ok_or_else(|| StoreError::stale(&locator.partition, locator.offset))?;
    let record = row_to_record(&row)
        .filter(|record| {
            record.created_at == locator.created_at && record.user_name == locator.user_name
        })
        .ok_or_else(|| StoreError::stale(&locator.partition, locator.offset))?;
    Ok((record, row))
}

/// Roll back an append made earlier in the same operation.
pub(crate) async fn undo_append<T: Table>(table: &T, len: usize) {
    if let Err(e) = table.truncate(len).await {
        tracing::error!(partition = table.name(), error = %e, "failed to roll back append");
    }
}

fn stale_on_missing(err: DatabaseError, locator: &RecordRef) -> StoreError {
    match err {
        DatabaseError::NoResult => StoreError::stale(&locator.partition, locator.offset),
        other => other.into(),
    }
}

pub(crate) fn record_to_row(record: &SupportRecord) -> Row {
    let mut row = vec![String::new(); RECORD_COLUMNS];
    row[record_col::CREATED_AT] = format_datetime(record.created_at);
    row[record_col::OCCURRED_AT] = format_datetime(record.occurred_at);
    row[record_col::USER].clone_from(&record.user_name);
    row[record_col::RECORDER].clone_from(&record.recorder_name);
    row[record_col::ITEM] = record.item.as_str().to_string();
    row[record_col::DETAIL_1].clone_from(&record.detail1);
    row[record_col::DETAIL_2].clone_from(&record.detail2);
    row[record_col::TEMP].clone_from(&record.vitals.temp);
    row[record_col::BP_HIGH].clone_from(&record.vitals.bp_high);
    row[record_col::BP_LOW].clone_from(&record.vitals.bp_low);
    row[record_col::PULSE].clone_from(&record.vitals.pulse);
    row[record_col::SPO2].clone_from(&record.vitals.spo2);
    row[record_col::WEIGHT].clone_from(&record.vitals.weight);
    row[record_col::CONTENT].clone_from(&record.content);
    row[record_col::SEARCH_INDEX].clone_from(&record.search_index);
    row
}

/// Parse a record row. `None` when either timestamp does not parse.
pub(crate) fn row_to_record(row: &[String]) -> Option<SupportRecord> {
    let mut row = row.to_vec();
    pad_row(&mut row, RECORD_COLUMNS);
    let text = |idx: usize| cell(&row, idx).to_string();
    Some(SupportRecord {
        created_at: parse_cell_datetime(cell(&row, record_col::CREATED_AT))?,
        occurred_at: parse_cell_datetime(cell(&row, record_col::OCCURRED_AT))?,
        user_name: text(record_col::USER),
        recorder_name: text(record_col::RECORDER),
        item: RecordItem::from_cell(cell(&row, record_col::ITEM)),
        detail1: text(record_col::DETAIL_1),
        detail2: text(record_col::DETAIL_2),
        vitals: Vitals {
            temp: text(record_col::TEMP),
            bp_high: text(record_col::BP_HIGH),
            bp_low: text(record_col::BP_LOW),
            pulse: text(record_col::PULSE),
            spo2: text(record_col::SPO2),
            weight: text(record_col::WEIGHT),
        },
        content: text(record_col::CONTENT),
        search_index: text(record_col::SEARCH_INDEX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{record_draft, sato, seeded_service, tanaka};
    use care_core::errors::ErrorKind;
    use care_core::partitions::archive_partition_name;
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
    }

    fn stored(user: &str, occurred_at: DateTime<Utc>, seq: i64) -> Row {
        let created = occurred_at + TimeDelta::seconds(seq);
        record_to_row(&SupportRecord::from_draft(
            &record_draft(occurred_at, &format!("note {seq}")),
            user,
            created,
        ))
    }

    /// Live holds 2026 rows, archives hold 2025 and 2024, for two users.
    async fn seed_partitions(svc: &CareService) {
        let tenant = svc.resolve_tenant("Beta").await.unwrap();
        let db = tenant.records();
        let mut seq = 0;
        for (partition, year) in [
            (RECORDS_LIVE.to_string(), 2026),
            (archive_partition_name(2025), 2025),
            (archive_partition_name(2024), 2024),
        ] {
            let mut rows = Vec::new();
            for day in 1..=6 {
                for user in ["山田", "佐藤"] {
                    seq += 1;
                    rows.push(stored(user, at(year, 1, day), seq));
                }
            }
            db.table(&partition).append_rows(&rows).await.unwrap();
        }
    }

    async fn collect_pages(svc: &CareService, query: &RecordQuery) -> Vec<RecordEntry> {
        let mut query = query.clone();
        let mut all = Vec::new();
        loop {
            let page = svc.get_records("Beta", &query).await.unwrap();
            assert!(page.records.len() <= query.limit);
            all.extend(page.records);
            match page.continuation {
                Some(token) => {
                    assert!(page.has_more);
                    query.continuation = Some(token);
                }
                None => {
                    assert!(!page.has_more);
                    break;
                }
            }
        }
        all
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(6)]
    #[case(7)]
    #[tokio::test]
    async fn paging_matches_one_large_call(#[case] limit: usize) {
        let svc = seeded_service().await;
        seed_partitions(&svc).await;
        let query = RecordQuery {
            user: Some("山田".into()),
            limit,
            ..RecordQuery::default()
        };
        let paged = collect_pages(&svc, &query).await;

        let whole = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    limit: 1000,
                    ..query.clone()
                },
            )
            .await
            .unwrap();
        assert!(!whole.has_more);
        assert_eq!(paged, whole.records);
        assert_eq!(paged.len(), 18);
    }

    #[tokio::test]
    async fn scan_order_is_live_then_newest_archive_newest_row_first() {
        let svc = seeded_service().await;
        seed_partitions(&svc).await;
        let page = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    user: Some("佐藤".into()),
                    limit: 100,
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap();
        let partitions: Vec<&str> = page
            .records
            .iter()
            .map(|e| e.locator.partition.as_str())
            .collect();
        assert_eq!(partitions[0], "records");
        assert_eq!(partitions[6], "records_archive_2025");
        assert_eq!(partitions[12], "records_archive_2024");
        assert!(page.records[0].record.occurred_at > page.records[1].record.occurred_at);
    }

    #[tokio::test]
    async fn date_bounds_are_inclusive() {
        let svc = seeded_service().await;
        seed_partitions(&svc).await;
        let page = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    user: Some("山田".into()),
                    start: Some(at(2025, 1, 2)),
                    end: Some(at(2026, 1, 2)),
                    limit: 100,
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap();
        // 2026-01-01..02 from live, 2025-01-02..06 from the 2025 archive
        assert_eq!(page.records.len(), 7);
    }

    #[tokio::test]
    async fn zero_limit_reports_whether_matches_exist() {
        let svc = seeded_service().await;
        seed_partitions(&svc).await;
        let page = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    user: Some("山田".into()),
                    limit: 0,
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap();
        assert!(page.records.is_empty());
        assert!(page.has_more);

        let none = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    user: Some("nobody".into()),
                    limit: 0,
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap();
        assert!(!none.has_more);
        assert!(none.continuation.is_none());
    }

    #[tokio::test]
    async fn unparseable_rows_are_skipped() {
        let svc = seeded_service().await;
        let tenant = svc.resolve_tenant("Beta").await.unwrap();
        let mut bad = stored("山田", at(2026, 2, 1), 1);
        bad[record_col::OCCURRED_AT] = "not a date".into();
        tenant
            .records()
            .table(RECORDS_LIVE)
            .append_rows(&[bad, stored("山田", at(2026, 2, 2), 2)])
            .await
            .unwrap();
        let page = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].locator.offset, 1);
    }

    #[tokio::test]
    async fn token_for_unknown_partition_is_rejected() {
        let svc = seeded_service().await;
        let err = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    limit: 10,
                    continuation: Some(ContinuationToken::new("records_archive_1999", 0)),
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn offset_past_usize_range_is_rejected() {
        let svc = seeded_service().await;
        let err = svc
            .get_records(
                "Beta",
                &RecordQuery {
                    limit: 10,
                    continuation: Some(ContinuationToken::new(RECORDS_LIVE, usize::MAX)),
                    ..RecordQuery::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn fan_out_sibling_does_not_satisfy_a_shifted_locator() {
        let svc = seeded_service().await;
        let session = tanaka("Beta");
        let draft = record_draft(at(2026, 3, 1), "入浴");
        let users = vec!["山田".to_string(), "佐藤".to_string(), "鈴木".to_string()];
        svc.add_records(&session, "Beta", &draft, &users).await.unwrap();
        let page = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        let locator_of = |user: &str| {
            page.records
                .iter()
                .find(|e| e.record.user_name == user)
                .map(|e| e.locator.clone())
                .unwrap()
        };
        let (yamada, sato_row) = (locator_of("山田"), locator_of("佐藤"));
        assert_eq!(yamada.created_at, sato_row.created_at);

        svc.delete_record(&session, "Beta", &yamada).await.unwrap();

        let mut change = draft.clone();
        change.content = "入浴を中止".into();
        let err = svc
            .edit_record(&session, "Beta", &sato_row, &change)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleReference);
        let err = svc.delete_record(&session, "Beta", &sato_row).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleReference);

        let after = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        let mut remaining: Vec<(String, String)> = after
            .records
            .iter()
            .map(|e| (e.record.user_name.clone(), e.record.content.clone()))
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![
                ("佐藤".to_string(), "入浴".to_string()),
                ("鈴木".to_string(), "入浴".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn fan_out_writes_one_row_per_user_and_one_event() {
        let svc = seeded_service().await;
        let users = vec!["山田".to_string(), " ".to_string(), "佐藤".to_string()];
        let saved = svc
            .add_records(&tanaka("Beta"), "Beta", &record_draft(at(2026, 3, 1), "昼食"), &users)
            .await
            .unwrap();
        assert_eq!(saved.len(), 2);

        let events = svc
            .query_audit(&crate::repos::AuditFilter {
                action: Some(AuditAction::RecordSave),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target_id, "山田,佐藤");
    }

    #[tokio::test]
    async fn empty_targets_fail_before_any_write() {
        let svc = seeded_service().await;
        let err = svc
            .add_records(&tanaka("Beta"), "Beta", &record_draft(at(2026, 3, 1), "x"), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let tenant = svc.resolve_tenant("Beta").await.unwrap();
        assert_eq!(tenant.records().table(RECORDS_LIVE).row_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn writes_outside_scope_are_rejected() {
        let svc = seeded_service().await;
        let err = svc
            .add_records(
                &tanaka("Alpha"),
                "Alpha",
                &record_draft(at(2026, 3, 1), "x"),
                &["山田".to_string()],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn edit_preserves_user_and_detects_shifted_rows() {
        let svc = seeded_service().await;
        let session = tanaka("Beta");
        let draft = record_draft(at(2026, 3, 1), "朝食");
        svc.add_records(&session, "Beta", &draft, &["山田".into(), "佐藤".into()])
            .await
            .unwrap();
        let page = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        let target = page.records[0].clone();

        let mut change = draft.clone();
        change.content = "朝食を半分".into();
        let edited = svc
            .edit_record(&session, "Beta", &target.locator, &change)
            .await
            .unwrap();
        assert_eq!(edited.user_name, target.record.user_name);
        assert_eq!(edited.created_at, target.record.created_at);
        assert!(edited.search_index.contains("朝食を半分"));

        let mut shifted = target.locator.clone();
        shifted.created_at += TimeDelta::seconds(1);
        let err = svc
            .edit_record(&session, "Beta", &shifted, &change)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleReference);

        let mut out_of_bounds = target.locator;
        out_of_bounds.offset = 99;
        let err = svc
            .edit_record(&session, "Beta", &out_of_bounds, &change)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleReference);
    }

    #[tokio::test]
    async fn delete_and_restore_round_trip_through_trash() {
        let svc = seeded_service().await;
        let session = sato("Beta");
        svc.add_records(
            &session,
            "Beta",
            &record_draft(at(2026, 3, 1), "夕食"),
            &["山田".into()],
        )
        .await
        .unwrap();
        let page = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        let locator = page.records[0].locator.clone();

        svc.delete_record(&session, "Beta", &locator).await.unwrap();
        let empty = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        assert!(empty.records.is_empty());

        let trash = svc.list_record_trash("Beta").await.unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].deleted_by, "Sato");
        assert!(trash[0].deleted_at.is_some());

        // deleting the same locator again finds nothing there
        let err = svc.delete_record(&session, "Beta", &locator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StaleReference);

        let restored = svc
            .restore_record(&session, "Beta", &trash[0].locator())
            .await
            .unwrap();
        assert_eq!(restored, page.records[0].record);
        assert!(svc.list_record_trash("Beta").await.unwrap().is_empty());
        let back = svc
            .get_records("Beta", &RecordQuery { limit: 10, ..RecordQuery::default() })
            .await
            .unwrap();
        assert_eq!(back.records[0].record, restored);
    }

    #[tokio::test]
    async fn restore_requires_a_trash_locator() {
        let svc = seeded_service().await;
        let locator = RecordRef {
            partition: RECORDS_LIVE.into(),
            offset: 0,
            created_at: Utc::now(),
            user_name: "Suzuki".into(),
        };
        let err = svc
            .restore_record(&sato("Beta"), "Beta", &locator)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
