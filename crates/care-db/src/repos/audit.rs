//! Audit log repository.
//!
//! Append-only events in the master store's `audit_log` partition. Appends
//! are fire-and-forget: a failed append is logged and never fails the
//! operation being audited. Supports dynamic filtering and TTL purging.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use care_core::audit_detail::PurgeDetail;
use care_core::entities::{AUDIT_SCHEMA_VERSION, AuditContext, AuditEvent};
use care_core::enums::{AuditAction, AuditStatus, TargetType};
use care_core::partitions::{AUDIT_COLUMNS, AUDIT_LOG, audit_col};
use care_core::responses::PurgeOutcome;

use crate::error::{DatabaseError, StoreError};
use crate::helpers::{
    cell, format_datetime, pad_row, parse_cell_datetime, parse_optional_json,
};
use crate::service::CareService;
use crate::storage::{Row, Table};

/// What an operation is about to record.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: String,
    pub target_date: String,
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

impl AuditDraft {
    #[must_use]
    pub const fn new(action: AuditAction, target_type: TargetType) -> Self {
        Self {
            action,
            target_type,
            target_id: String::new(),
            target_date: String::new(),
            message: String::new(),
            detail: None,
        }
    }

    #[must_use]
    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.target_id = id.into();
        self
    }

    #[must_use]
    pub fn target_date(mut self, date: Option<DateTime<Utc>>) -> Self {
        self.target_date = date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn detail<T: Serialize>(mut self, detail: &T) -> Self {
        self.detail = serde_json::to_value(detail).ok();
        self
    }
}

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub office: Option<String>,
    pub action: Option<AuditAction>,
    pub executor: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl CareService {
    /// Append one event. Never fails the caller.
    pub async fn record_event(&self, ctx: &AuditContext, draft: AuditDraft, status: AuditStatus) {
        let now = Utc::now();
        let retention = TimeDelta::days(self.config().retention.audit_retention_days);
        let executor = if ctx.executor.is_empty() {
            "System".to_string()
        } else {
            ctx.executor.clone()
        };
        let search_index = format!("{}|{}|{}", ctx.office_selected, draft.action, executor);
        let event = AuditEvent {
            timestamp: now,
            schema_version: AUDIT_SCHEMA_VERSION.to_string(),
            executor,
            role: ctx.role.clone(),
            offices_authorized: ctx.offices_authorized.clone(),
            office_selected: ctx.office_selected.clone(),
            action: draft.action,
            target_type: draft.target_type,
            target_id: draft.target_id,
            target_date: draft.target_date,
            status,
            message: draft.message,
            detail: draft.detail,
            client_info: String::new(),
            request_id: uuid::Uuid::new_v4().to_string(),
            expires_at: now + retention,
            search_index,
        };
        let row = event_to_row(&event);
        if let Err(e) = self.master().table(AUDIT_LOG).append_rows(&[row]).await {
            tracing::warn!(
                action = %event.action,
                office = %event.office_selected,
                error = %e,
                "failed to append audit event"
            );
        }
    }

    /// Record the outcome of a public operation and pass the result through.
    pub(crate) async fn audited<T>(
        &self,
        ctx: &AuditContext,
        draft: AuditDraft,
        result: Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        match &result {
            Ok(_) => self.record_event(ctx, draft, AuditStatus::Success).await,
            Err(e) => self.record_failure(ctx, draft, e).await,
        }
        result
    }

    pub(crate) async fn record_failure(&self, ctx: &AuditContext, draft: AuditDraft, err: &StoreError) {
        tracing::debug!(action = %draft.action, kind = %err.kind(), error = %err, "operation failed");
        self.record_event(ctx, draft.message(err.to_string()), AuditStatus::Error)
            .await;
    }

    /// Query audit events, newest first.
    ///
    /// Office, action and executor are matched in SQL against the stored
    /// cells; `since` and `limit` are applied to the decoded events.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEvent>, StoreError> {
        let mut conditions = vec!["partition = ?1".to_string()];
        let mut params: Vec<libsql::Value> = vec![libsql::Value::Text(AUDIT_LOG.to_string())];

        if let Some(ref office) = filter.office {
            params.push(libsql::Value::Text(office.trim().to_string()));
            conditions.push(format!(
                "json_extract(cells, '$[{}]') = ?{}",
                audit_col::OFFICE_SELECTED,
                params.len()
            ));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!(
                "json_extract(cells, '$[{}]') = ?{}",
                audit_col::ACTION,
                params.len()
            ));
        }
        if let Some(ref executor) = filter.executor {
            params.push(libsql::Value::Text(executor.clone()));
            conditions.push(format!(
                "json_extract(cells, '$[{}]') = ?{}",
                audit_col::EXECUTOR,
                params.len()
            ));
        }

        let sql = format!(
            "SELECT cells FROM partition_rows WHERE {} ORDER BY seq DESC",
            conditions.join(" AND ")
        );
        let master = self.master();
        let raw = master
            .bounded(async {
                let mut rows = master.conn().query(&sql, params).await?;
                let mut out = Vec::new();
                while let Some(row) = rows.next().await? {
                    out.push(row.get::<String>(0)?);
                }
                Ok::<_, DatabaseError>(out)
            })
            .await?;

        let limit = filter.limit.unwrap_or(usize::MAX);
        let events = raw
            .iter()
            .filter_map(|cells| serde_json::from_str::<Row>(cells).ok())
            .filter_map(|row| row_to_event(&row))
            .filter(|event| filter.since.is_none_or(|since| event.timestamp >= since))
            .take(limit)
            .collect();
        Ok(events)
    }

    /// Drop events whose `expires_at` has passed.
    ///
    /// Rows with an unparseable `expires_at` are kept. Emits `LOG_CLEANUP`
    /// only when rows were removed, so a second run is silent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the log cannot be read or rewritten.
    pub async fn purge_expired_audit_events(
        &self,
        now: DateTime<Utc>,
    ) -> Result<PurgeOutcome, StoreError> {
        let ctx = AuditContext::system("");
        let result = self.purge_audit_rows(now).await;
        match &result {
            Ok(outcome) if outcome.removed > 0 => {
                let draft = AuditDraft::new(AuditAction::LogCleanup, TargetType::Log)
                    .target(AUDIT_LOG)
                    .message(format!("removed {} expired audit events", outcome.removed))
                    .detail(&PurgeDetail {
                        partition: outcome.partition.clone(),
                        removed: outcome.removed,
                        kept: outcome.kept,
                    });
                self.record_event(&ctx, draft, AuditStatus::Success).await;
            }
            Ok(_) => {}
            Err(e) => {
                let draft = AuditDraft::new(AuditAction::LogCleanup, TargetType::Log).target(AUDIT_LOG);
                self.record_failure(&ctx, draft, e).await;
            }
        }
        result
    }

    async fn purge_audit_rows(&self, now: DateTime<Utc>) -> Result<PurgeOutcome, StoreError> {
        let table = self.master().table(AUDIT_LOG);
        let rows = table.read_all().await?;
        let before = rows.len();
        let kept: Vec<Row> = rows
            .into_iter()
            .filter(|row| {
                parse_cell_datetime(cell(row, audit_col::EXPIRES_AT)).is_none_or(|exp| exp > now)
            })
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            table.overwrite_all(&kept).await?;
            tracing::info!(removed, kept = kept.len(), "purged expired audit events");
        }
        Ok(PurgeOutcome {
            partition: AUDIT_LOG.to_string(),
            removed,
            kept: kept.len(),
        })
    }
}

fn event_to_row(event: &AuditEvent) -> Row {
    let mut row = vec![String::new(); AUDIT_COLUMNS];
    row[audit_col::TIMESTAMP] = format_datetime(event.timestamp);
    row[audit_col::SCHEMA_VERSION].clone_from(&event.schema_version);
    row[audit_col::EXECUTOR].clone_from(&event.executor);
    row[audit_col::ROLE].clone_from(&event.role);
    row[audit_col::OFFICES_AUTHORIZED].clone_from(&event.offices_authorized);
    row[audit_col::OFFICE_SELECTED].clone_from(&event.office_selected);
    row[audit_col::ACTION] = event.action.as_str().to_string();
    row[audit_col::TARGET_TYPE] = event.target_type.as_str().to_string();
    row[audit_col::TARGET_ID].clone_from(&event.target_id);
    row[audit_col::TARGET_DATE].clone_from(&event.target_date);
    row[audit_col::STATUS] = event.status.as_str().to_string();
    row[audit_col::MESSAGE].clone_from(&event.message);
    row[audit_col::DETAIL] = event
        .detail
        .as_ref()
        .map(std::string::ToString::to_string)
        .unwrap_or_default();
    row[audit_col::CLIENT_INFO].clone_from(&event.client_info);
    row[audit_col::REQUEST_ID].clone_from(&event.request_id);
    row[audit_col::EXPIRES_AT] = format_datetime(event.expires_at);
    row[audit_col::SEARCH_INDEX].clone_from(&event.search_index);
    row
}

fn row_to_event(row: &Row) -> Option<AuditEvent> {
    let mut row = row.clone();
    pad_row(&mut row, AUDIT_COLUMNS);
    let text = |idx: usize| cell(&row, idx).to_string();
    Some(AuditEvent {
        timestamp: parse_cell_datetime(cell(&row, audit_col::TIMESTAMP))?,
        schema_version: text(audit_col::SCHEMA_VERSION),
        executor: text(audit_col::EXECUTOR),
        role: text(audit_col::ROLE),
        offices_authorized: text(audit_col::OFFICES_AUTHORIZED),
        office_selected: text(audit_col::OFFICE_SELECTED),
        action: AuditAction::from_cell(cell(&row, audit_col::ACTION))?,
        target_type: TargetType::from_cell(cell(&row, audit_col::TARGET_TYPE))?,
        target_id: text(audit_col::TARGET_ID),
        target_date: text(audit_col::TARGET_DATE),
        status: AuditStatus::from_cell(cell(&row, audit_col::STATUS))?,
        message: text(audit_col::MESSAGE),
        detail: parse_optional_json(cell(&row, audit_col::DETAIL)).ok().flatten(),
        client_info: text(audit_col::CLIENT_INFO),
        request_id: text(audit_col::REQUEST_ID),
        expires_at: parse_cell_datetime(cell(&row, audit_col::EXPIRES_AT))?,
        search_index: text(audit_col::SEARCH_INDEX),
    })
}
