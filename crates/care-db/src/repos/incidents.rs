//! Incident report repository and approval workflow.
//!
//! Reports live in the `incidents` partition of an office's incidents store.
//! A report's `id` is durable; its row offset is re-resolved from the id
//! immediately before every write.
//!
//! ```text
//! create → pending → approved          (manager + PIN)
//!                  → returned → approved
//! edit: any → pending
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use care_auth::{AuthError, Session};
use care_core::audit_detail::StatusChangedDetail;
use care_core::entities::{IncidentDraft, IncidentEntry, IncidentReport, TrashEntry};
use care_core::enums::{AuditAction, IncidentStatus, TargetType};
use care_core::errors::CoreError;
use care_core::names::{names_match, normalize_name};
use care_core::pagination::ContinuationToken;
use care_core::partitions::{
    INCIDENT_COLUMNS, INCIDENTS_LIVE, INCIDENTS_TRASH, TRASH_PREFIX_COLUMNS, incident_col,
};
use care_core::responses::{HistoryPage, PendingPage};

use crate::error::StoreError;
use crate::helpers::{
    cell, format_datetime, format_optional_datetime, opt_cell, pad_row, parse_cell_datetime,
};
use crate::repos::audit::AuditDraft;
use crate::repos::records::undo_append;
use crate::service::CareService;
use crate::storage::{Row, Table};

const CSV_HEADER: [&str; 13] = [
    "ID",
    "発生日時",
    "記録者",
    "利用者",
    "種別",
    "場所",
    "状況",
    "原因",
    "対応",
    "再発防止策",
    "ステータス",
    "承認者",
    "承認日時",
];

/// Filters for approved-incident history and its CSV export.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Subject user, compared after name normalization.
    pub user: Option<String>,
    /// Recorder, compared after name normalization.
    pub recorder: Option<String>,
    /// Exact incident type.
    pub incident_type: Option<String>,
    /// First day included (from midnight UTC).
    pub from: Option<NaiveDate>,
    /// Last day included (through the end of the day).
    pub to: Option<NaiveDate>,
}

impl HistoryFilter {
    fn matches(&self, report: &IncidentReport) -> bool {
        if report.status != IncidentStatus::Approved {
            return false;
        }
        if let Some(user) = &self.user {
            if normalize_name(&report.subject_user) != normalize_name(user) {
                return false;
            }
        }
        if let Some(recorder) = &self.recorder {
            if !names_match(&report.recorder, recorder) {
                return false;
            }
        }
        if let Some(kind) = &self.incident_type {
            if report.incident_type != *kind {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(occurred) = report.occurred_at else {
            return false;
        };
        let after_from = self
            .from
            .is_none_or(|from| occurred >= from.and_time(NaiveTime::MIN).and_utc());
        let before_to = self.to.is_none_or(|to| {
            occurred < (to.and_time(NaiveTime::MIN) + TimeDelta::days(1)).and_utc()
        });
        after_from && before_to
    }
}

impl CareService {
    /// File a new report. Always starts `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank subject user or type, and
    /// `NotConfigured` when the office has no incidents store.
    pub async fn create_incident(
        &self,
        session: &Session,
        office: &str,
        draft: &IncidentDraft,
    ) -> Result<IncidentReport, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let audit = AuditDraft::new(AuditAction::IncidentAdd, TargetType::Incident)
            .target(id.clone())
            .target_date(Some(draft.occurred_at))
            .message(format!("{} / {}", draft.subject_user.trim(), draft.incident_type.trim()));
        let result = async {
            validate_draft(draft)?;
            session.ensure_office(office)?;
            let tenant = self.resolve_tenant(office).await?;
            let report = IncidentReport::new(id.clone(), &session.name, draft, Utc::now());
            tenant
                .incidents()?
                .table(INCIDENTS_LIVE)
                .append_rows(&[incident_to_row(&report)])
                .await?;
            Ok::<_, StoreError>(report)
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_incident(&self, office: &str, id: &str) -> Result<IncidentEntry, StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let table = tenant.incidents()?.table(INCIDENTS_LIVE);
        let (offset, row) = find_by_id(&table, id, 0).await?;
        Ok(IncidentEntry {
            offset,
            report: row_to_incident(&row)?,
        })
    }

    /// Overwrite the business fields and reset the report to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `Authorization` unless the caller recorded the report or is a
    /// manager.
    pub async fn edit_incident(
        &self,
        session: &Session,
        office: &str,
        id: &str,
        draft: &IncidentDraft,
    ) -> Result<IncidentReport, StoreError> {
        let audit = AuditDraft::new(AuditAction::IncidentUpdate, TargetType::Incident)
            .target(id)
            .target_date(Some(draft.occurred_at));
        let result = async {
            validate_draft(draft)?;
            session.ensure_office(office)?;
            let tenant = self.resolve_tenant(office).await?;
            let table = tenant.incidents()?.table(INCIDENTS_LIVE);
            let (offset, row) = find_by_id(&table, id, 0).await?;
            let mut report = row_to_incident(&row)?;
            ensure_recorder_or_manager(session, &report, "edit this report")?;

            report.apply_draft(draft);
            table.update_row(offset, &incident_to_row(&report)).await?;
            Ok::<_, StoreError>(report)
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// Approve a `Pending` or `Returned` report.
    ///
    /// Requires the manager role and a fresh PIN check.
    ///
    /// # Errors
    ///
    /// Returns `Authentication` for a wrong PIN, `Authorization` for staff,
    /// and `Validation` for a report that is already approved.
    pub async fn approve_incident(
        &self,
        session: &Session,
        office: &str,
        id: &str,
        pin: &str,
    ) -> Result<IncidentReport, StoreError> {
        let result = async {
            session.ensure_office(office)?;
            let approver = self.step_up(session, office, pin).await?;
            approver.ensure_manager("approve incident reports")?;
            self.transition(office, id, IncidentStatus::Approved, |report, now| {
                report.approve(&approver.name, now);
            })
            .await
        }
        .await;
        let audit = status_audit(AuditAction::IncidentApprove, id, &result, None);
        self.audited(&session.audit_context(office), audit, result)
            .await
            .map(|(report, _)| report)
    }

    /// Send a `Pending` report back to its recorder with a reason.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank reason or a report that is not
    /// `Pending`; otherwise as [`Self::approve_incident`].
    pub async fn return_incident(
        &self,
        session: &Session,
        office: &str,
        id: &str,
        pin: &str,
        reason: &str,
    ) -> Result<IncidentReport, StoreError> {
        let reason = reason.trim();
        let result = async {
            if reason.is_empty() {
                return Err(StoreError::validation("a return reason is required"));
            }
            session.ensure_office(office)?;
            let manager = self.step_up(session, office, pin).await?;
            manager.ensure_manager("return incident reports")?;
            self.transition(office, id, IncidentStatus::Returned, |report, now| {
                report.send_back(reason, now);
            })
            .await
        }
        .await;
        let audit = status_audit(AuditAction::IncidentReturn, id, &result, Some(reason));
        self.audited(&session.audit_context(office), audit, result)
            .await
            .map(|(report, _)| report)
    }

    /// Re-resolve `id`, check the transition and rewrite the row.
    ///
    /// Returns the updated report and the status it left.
    async fn transition(
        &self,
        office: &str,
        id: &str,
        to: IncidentStatus,
        apply: impl FnOnce(&mut IncidentReport, DateTime<Utc>) + Send,
    ) -> Result<(IncidentReport, IncidentStatus), StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let table = tenant.incidents()?.table(INCIDENTS_LIVE);
        let (offset, row) = find_by_id(&table, id, 0).await?;
        let mut report = row_to_incident(&row)?;
        let from = report.status;
        if !from.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                entity_type: "incident".to_string(),
                id: id.to_string(),
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            }
            .into());
        }
        apply(&mut report, Utc::now());
        table.update_row(offset, &incident_to_row(&report)).await?;
        Ok((report, from))
    }

    /// Move a report to `incidents_trash` as `[deleted_at, deleted_by, ...row]`.
    ///
    /// # Errors
    ///
    /// Returns `Authorization` unless the caller recorded the report or is a
    /// manager.
    pub async fn delete_incident(
        &self,
        session: &Session,
        office: &str,
        id: &str,
    ) -> Result<(), StoreError> {
        let audit = AuditDraft::new(AuditAction::IncidentTrash, TargetType::Incident).target(id);
        let result = async {
            session.ensure_office(office)?;
            let tenant = self.resolve_tenant(office).await?;
            let store = tenant.incidents()?;
            let table = store.table(INCIDENTS_LIVE);
            let (offset, row) = find_by_id(&table, id, 0).await?;
            let report = row_to_incident(&row)?;
            ensure_recorder_or_manager(session, &report, "delete this report")?;

            let trash = store.table(INCIDENTS_TRASH);
            let trash_len = trash.row_count().await?;
            let mut trashed = vec![format_datetime(Utc::now()), session.name.clone()];
            trashed.extend(row);
            trash.append_rows(&[trashed]).await?;

            // the row may have shifted while the trash row was written
            let (offset, _) = match find_by_id(&table, id, 0).await {
                Ok(found) => found,
                Err(e) => {
                    undo_append(&trash, trash_len).await;
                    return Err(e);
                }
            };
            if let Err(e) = table.delete_row(offset).await {
                undo_append(&trash, trash_len).await;
                return Err(e.into());
            }
            tracing::debug!(id, offset, "trashed incident report");
            Ok::<_, StoreError>(())
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// Move a trashed report back to the end of the live partition.
    ///
    /// # Errors
    ///
    /// Returns `Authorization` for staff and `NotFound` when the id is not in
    /// the trash.
    pub async fn restore_incident(
        &self,
        session: &Session,
        office: &str,
        id: &str,
    ) -> Result<IncidentReport, StoreError> {
        let audit = AuditDraft::new(AuditAction::IncidentRestore, TargetType::Trash).target(id);
        let result = async {
            session.ensure_office(office)?;
            session.ensure_manager("restore incident reports")?;
            let tenant = self.resolve_tenant(office).await?;
            let store = tenant.incidents()?;
            let trash = store.table(INCIDENTS_TRASH);
            let (_, original) = find_by_id(&trash, id, TRASH_PREFIX_COLUMNS).await?;
            let report = row_to_incident(&original)?;

            let live = store.table(INCIDENTS_LIVE);
            let live_len = live.row_count().await?;
            live.append_rows(&[original]).await?;

            let (offset, _) = match find_by_id(&trash, id, TRASH_PREFIX_COLUMNS).await {
                Ok(found) => found,
                Err(e) => {
                    undo_append(&live, live_len).await;
                    return Err(e);
                }
            };
            if let Err(e) = trash.delete_row(offset).await {
                undo_append(&live, live_len).await;
                return Err(e.into());
            }
            Ok::<_, StoreError>(report)
        }
        .await;
        self.audited(&session.audit_context(office), audit, result).await
    }

    /// Trashed reports, most recently deleted first.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when the office has no incidents store.
    pub async fn list_incident_trash(
        &self,
        office: &str,
    ) -> Result<Vec<TrashEntry<IncidentReport>>, StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let rows = tenant.incidents()?.table(INCIDENTS_TRASH).read_all().await?;
        Ok(rows
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(offset, row)| {
                let item = row_to_incident(row.get(TRASH_PREFIX_COLUMNS..).unwrap_or(&[])).ok()?;
                Some(TrashEntry {
                    offset,
                    deleted_at: parse_cell_datetime(cell(row, 0)),
                    deleted_by: cell(row, 1).to_string(),
                    item,
                })
            })
            .collect())
    }

    /// Work waiting on `actor`, newest first.
    ///
    /// Managers see every `Returned` report; staff see their own `Pending`
    /// and `Returned` reports. Only the recorder and status columns are read
    /// to build the index; full rows are fetched for the page alone.
    ///
    /// # Errors
    ///
    /// Returns `Authorization` when `actor` does not cover `office`.
    pub async fn list_pending(
        &self,
        office: &str,
        actor: &Session,
        limit: usize,
        offset: usize,
    ) -> Result<PendingPage, StoreError> {
        actor.ensure_office(office)?;
        let limit = limit.clamp(1, self.config().pagination.pending_max_limit);
        let tenant = self.resolve_tenant(office).await?;
        let table = tenant.incidents()?.table(INCIDENTS_LIVE);

        let count = table.row_count().await?;
        let recorders = table.read_range(0, count, incident_col::RECORDER, 1).await?;
        let statuses = table.read_range(0, count, incident_col::STATUS, 1).await?;
        let visible: Vec<usize> = recorders
            .iter()
            .zip(&statuses)
            .enumerate()
            .rev()
            .filter(|(_, (recorder, status))| {
                let status = IncidentStatus::from_cell(cell(status, 0));
                if actor.role.is_manager() {
                    status == Some(IncidentStatus::Returned)
                } else {
                    matches!(
                        status,
                        Some(IncidentStatus::Pending | IncidentStatus::Returned)
                    ) && names_match(cell(recorder, 0), &actor.name)
                }
            })
            .map(|(row_offset, _)| row_offset)
            .collect();

        let total = visible.len();
        let mut items = Vec::new();
        for &row_offset in visible.iter().skip(offset).take(limit) {
            let mut rows = table.read_range(row_offset, 1, 0, INCIDENT_COLUMNS).await?;
            if let Some(row) = rows.pop() {
                match row_to_incident(&row) {
                    Ok(report) => items.push(IncidentEntry {
                        offset: row_offset,
                        report,
                    }),
                    Err(e) => tracing::debug!(row_offset, error = %e, "skipping unreadable incident"),
                }
            }
        }
        Ok(PendingPage {
            items,
            total,
            has_more: total > offset + limit,
        })
    }

    /// Every `Pending` report, newest `created_at` first. Managers only.
    ///
    /// # Errors
    ///
    /// Returns `Authorization` for staff.
    pub async fn list_approval_queue(
        &self,
        office: &str,
        actor: &Session,
    ) -> Result<Vec<IncidentEntry>, StoreError> {
        actor.ensure_office(office)?;
        actor.ensure_manager("view the approval queue")?;
        let tenant = self.resolve_tenant(office).await?;
        let rows = tenant.incidents()?.table(INCIDENTS_LIVE).read_all().await?;
        let mut queue: Vec<IncidentEntry> = rows
            .iter()
            .enumerate()
            .filter_map(|(offset, row)| {
                let report = row_to_incident(row).ok()?;
                (report.status == IncidentStatus::Pending)
                    .then_some(IncidentEntry { offset, report })
            })
            .collect();
        // newest first; rows without a parseable created_at go last
        queue.sort_by(|a, b| b.report.created_at.cmp(&a.report.created_at));
        Ok(queue)
    }

    /// Approved reports matching `filter`, newest first.
    ///
    /// Scans backward in chunks of `retention.history_chunk_size` rows and
    /// stops as soon as one match beyond the page is found.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a token that does not name the incidents
    /// partition or whose offset is out of range.
    pub async fn list_history(
        &self,
        office: &str,
        filter: &HistoryFilter,
        limit: usize,
        continuation: Option<&ContinuationToken>,
    ) -> Result<HistoryPage, StoreError> {
        let offset = match continuation {
            Some(token) if token.partition == INCIDENTS_LIVE => token.offset,
            Some(token) => {
                return Err(StoreError::validation(format!(
                    "continuation token names '{}', expected '{INCIDENTS_LIVE}'",
                    token.partition
                )));
            }
            None => 0,
        };
        let limit = limit.max(1);
        let tenant = self.resolve_tenant(office).await?;
        let table = tenant.incidents()?.table(INCIDENTS_LIVE);

        let wanted = offset
            .checked_add(limit)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                StoreError::validation(format!("continuation offset {offset} is out of range"))
            })?;
        let matches = scan_newest_first(
            &table,
            self.config().retention.history_chunk_size,
            filter,
            Some(wanted),
        )
        .await?;

        let has_more = matches.len() > offset + limit;
        Ok(HistoryPage {
            items: matches.into_iter().skip(offset).take(limit).collect(),
            has_more,
            continuation: has_more
                .then(|| ContinuationToken::new(INCIDENTS_LIVE, offset + limit)),
        })
    }

    /// Every approved report matching `filter` as CSV, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` when the office has no incidents store.
    pub async fn history_csv(&self, office: &str, filter: &HistoryFilter) -> Result<String, StoreError> {
        let tenant = self.resolve_tenant(office).await?;
        let table = tenant.incidents()?.table(INCIDENTS_LIVE);
        let matches = scan_newest_first(
            &table,
            self.config().retention.export_chunk_size,
            filter,
            None,
        )
        .await?;

        let mut lines = Vec::with_capacity(matches.len() + 1);
        lines.push(csv_line(CSV_HEADER.iter().copied()));
        for entry in &matches {
            let r = &entry.report;
            let occurred = r.occurred_at.map(csv_datetime).unwrap_or_default();
            let approved = r.approved_at.map(csv_datetime).unwrap_or_default();
            lines.push(csv_line([
                r.id.as_str(),
                occurred.as_str(),
                r.recorder.as_str(),
                r.subject_user.as_str(),
                r.incident_type.as_str(),
                r.place.as_str(),
                r.situation.as_str(),
                r.cause.as_str(),
                r.response.as_str(),
                r.prevention.as_str(),
                r.status.as_str(),
                r.approver.as_deref().unwrap_or_default(),
                approved.as_str(),
            ]));
        }
        tracing::info!(office, rows = matches.len(), "exported incident history");
        Ok(lines.join("\n") + "\n")
    }
}

/// Collect matching reports from the end of the partition backward.
async fn scan_newest_first<T: Table>(
    table: &T,
    chunk_size: usize,
    filter: &HistoryFilter,
    stop_after: Option<usize>,
) -> Result<Vec<IncidentEntry>, StoreError> {
    let chunk_size = chunk_size.max(1);
    let mut end = table.row_count().await?;
    let mut matches = Vec::new();
    while end > 0 {
        let start = end.saturating_sub(chunk_size);
        let rows = table
            .read_range(start, end - start, 0, INCIDENT_COLUMNS)
            .await?;
        tracing::debug!(start, end, "scanning incident chunk");
        for (i, row) in rows.iter().enumerate().rev() {
            let Ok(report) = row_to_incident(row) else {
                continue;
            };
            if filter.matches(&report) {
                matches.push(IncidentEntry {
                    offset: start + i,
                    report,
                });
                if stop_after.is_some_and(|n| matches.len() >= n) {
                    return Ok(matches);
                }
            }
        }
        end = start;
    }
    Ok(matches)
}

/// Find the row whose id cell (after `prefix` leading cells) equals `id`,
/// searching from the end. Only the id column is read for the search.
async fn find_by_id<T: Table>(table: &T, id: &str, prefix: usize) -> Result<(usize, Row), StoreError> {
    let count = table.row_count().await?;
    let ids = table
        .read_range(0, count, prefix + incident_col::ID, 1)
        .await?;
    let offset = ids
        .iter()
        .rposition(|cells| cell(cells, 0) == id)
        .ok_or_else(|| StoreError::not_found("incident", id))?;
    let mut rows = table
        .read_range(offset, 1, prefix, INCIDENT_COLUMNS)
        .await?;
    let row = rows
        .pop()
        .ok_or_else(|| StoreError::not_found("incident", id))?;
    Ok((offset, row))
}

fn validate_draft(draft: &IncidentDraft) -> Result<(), StoreError> {
    if draft.subject_user.trim().is_empty() {
        return Err(StoreError::validation("subject user is required"));
    }
    if draft.incident_type.trim().is_empty() {
        return Err(StoreError::validation("incident type is required"));
    }
    Ok(())
}

fn ensure_recorder_or_manager(
    session: &Session,
    report: &IncidentReport,
    action: &str,
) -> Result<(), AuthError> {
    if session.role.is_manager() || names_match(&report.recorder, &session.name) {
        Ok(())
    } else {
        Err(AuthError::NotRecorder {
            action: action.to_string(),
        })
    }
}

fn status_audit(
    action: AuditAction,
    id: &str,
    result: &Result<(IncidentReport, IncidentStatus), StoreError>,
    reason: Option<&str>,
) -> AuditDraft {
    let draft = AuditDraft::new(action, TargetType::Incident).target(id);
    match result {
        Ok((report, from)) => draft.target_date(report.occurred_at).detail(&StatusChangedDetail {
            from: from.as_str().to_string(),
            to: report.status.as_str().to_string(),
            reason: reason.map(String::from),
        }),
        Err(_) => draft,
    }
}

fn csv_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y/%m/%d %H:%M").to_string()
}

fn csv_line<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn incident_to_row(report: &IncidentReport) -> Row {
    let mut row = vec![String::new(); INCIDENT_COLUMNS];
    row[incident_col::ID].clone_from(&report.id);
    row[incident_col::CREATED_AT] = format_optional_datetime(report.created_at);
    row[incident_col::OCCURRED_AT] = format_optional_datetime(report.occurred_at);
    row[incident_col::RECORDER].clone_from(&report.recorder);
    row[incident_col::SUBJECT_USER].clone_from(&report.subject_user);
    row[incident_col::TYPE].clone_from(&report.incident_type);
    row[incident_col::PLACE].clone_from(&report.place);
    row[incident_col::SITUATION].clone_from(&report.situation);
    row[incident_col::CAUSE].clone_from(&report.cause);
    row[incident_col::RESPONSE].clone_from(&report.response);
    row[incident_col::PREVENTION].clone_from(&report.prevention);
    row[incident_col::STATUS] = report.status.as_str().to_string();
    row[incident_col::APPROVER] = report.approver.clone().unwrap_or_default();
    row[incident_col::APPROVED_AT] = format_optional_datetime(report.approved_at);
    row[incident_col::RETURN_REASON] = report.return_reason.clone().unwrap_or_default();
    row[incident_col::RETURNED_AT] = format_optional_datetime(report.returned_at);
    row
}

/// Parse an incident row.
///
/// # Errors
///
/// Returns `Validation` when the status cell is not a known spelling.
pub(crate) fn row_to_incident(row: &[String]) -> Result<IncidentReport, StoreError> {
    let mut row = row.to_vec();
    pad_row(&mut row, INCIDENT_COLUMNS);
    let text = |idx: usize| cell(&row, idx).to_string();
    let status_cell = cell(&row, incident_col::STATUS);
    let status = IncidentStatus::from_cell(status_cell).ok_or_else(|| {
        StoreError::validation(format!(
            "incident '{}' has unrecognized status '{status_cell}'",
            cell(&row, incident_col::ID)
        ))
    })?;
    Ok(IncidentReport {
        id: text(incident_col::ID),
        created_at: parse_cell_datetime(cell(&row, incident_col::CREATED_AT)),
        occurred_at: parse_cell_datetime(cell(&row, incident_col::OCCURRED_AT)),
        recorder: text(incident_col::RECORDER),
        subject_user: text(incident_col::SUBJECT_USER),
        incident_type: text(incident_col::TYPE),
        place: text(incident_col::PLACE),
        situation: text(incident_col::SITUATION),
        cause: text(incident_col::CAUSE),
        response: text(incident_col::RESPONSE),
        prevention: text(incident_col::PREVENTION),
        status,
        approver: opt_cell(&row, incident_col::APPROVER),
        approved_at: parse_cell_datetime(cell(&row, incident_col::APPROVED_AT)),
        return_reason: opt_cell(&row, incident_col::RETURN_REASON),
        returned_at: parse_cell_datetime(cell(&row, incident_col::RETURNED_AT)),
    })
}
