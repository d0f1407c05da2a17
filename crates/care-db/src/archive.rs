//! Archive engine and retention jobs.
//!
//! Aged support records move from the live partition into
//! `records_archive_<YYYY>` partitions keyed by each row's own occurrence
//! year. A move is verified by row counts and rolled back on mismatch.
//! Purges drop expired archives, trash rows and audit events.
//!
//! Every job is idempotent: a second run with the same `now` moves or removes
//! nothing and writes no audit event.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, TimeDelta, Utc};

use care_core::audit_detail::{ArchiveCleanupDetail, ArchiveMoveDetail, PurgeDetail};
use care_core::entities::AuditContext;
use care_core::enums::{AuditAction, AuditStatus, TargetType};
use care_core::partitions::{
    INCIDENTS_TRASH, RECORDS_LIVE, RECORDS_TRASH, archive_partition_name, archive_year, record_col,
};
use care_core::responses::{JobOutcome, MaintenanceReport, PurgeOutcome, SweepOutcome};

use crate::CareDb;
use crate::error::{DatabaseError, StoreError};
use crate::helpers::{cell, parse_cell_datetime};
use crate::repos::audit::AuditDraft;
use crate::service::CareService;
use crate::storage::{Row, Table};

/// Counts from one aged-row move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveSummary {
    pub moved: usize,
    pub kept: usize,
    pub archives: Vec<String>,
}

/// Move rows of `live` that occurred before `threshold` into the archive
/// partitions of `store`.
///
/// Rows whose occurrence date does not parse stay live. After the move,
/// `live_after + Σ(archive_after - archive_before) == live_before` must hold;
/// otherwise live is restored from its snapshot, every touched archive is
/// truncated to its previous length, and `StoreError::Integrity` is returned.
///
/// # Errors
///
/// Returns `StoreError::Integrity` on a count mismatch and
/// `StoreError::Database` on a storage failure (also rolled back).
pub async fn move_aged_rows<L: Table>(
    live: &L,
    store: &CareDb,
    threshold: DateTime<Utc>,
    batch_size: usize,
) -> Result<MoveSummary, StoreError> {
    let snapshot = live.read_all().await?;
    let live_before = snapshot.len();

    let mut by_year: BTreeMap<i32, Vec<Row>> = BTreeMap::new();
    let mut keep = Vec::new();
    for row in &snapshot {
        match parse_cell_datetime(cell(row, record_col::OCCURRED_AT)) {
            Some(occurred) if occurred < threshold => {
                by_year.entry(occurred.year()).or_default().push(row.clone());
            }
            _ => keep.push(row.clone()),
        }
    }
    if by_year.is_empty() {
        return Ok(MoveSummary {
            moved: 0,
            kept: live_before,
            archives: Vec::new(),
        });
    }

    let mut before = BTreeMap::new();
    for year in by_year.keys() {
        let name = archive_partition_name(*year);
        let existed = store.partition_exists(&name).await?;
        let len = store.table(&name).row_count().await?;
        before.insert(name, (len, existed));
    }

    let attempt = async {
        for (year, rows) in &by_year {
            let archive = store.table(&archive_partition_name(*year));
            for batch in rows.chunks(batch_size.max(1)) {
                archive.append_rows(batch).await?;
            }
        }
        live.overwrite_all(&keep).await?;

        let live_after = live.row_count().await?;
        let mut appended = 0;
        for (name, (len, _)) in &before {
            appended += store.table(name).row_count().await?.saturating_sub(*len);
        }
        if live_after + appended != live_before {
            return Err(StoreError::Integrity {
                partition: live.name().to_string(),
                expected: live_before,
                actual: live_after + appended,
            });
        }
        Ok(())
    }
    .await;

    if let Err(e) = attempt {
        tracing::error!(partition = live.name(), error = %e, "archive move failed, rolling back");
        if let Err(restore) = live.overwrite_all(&snapshot).await {
            tracing::error!(partition = live.name(), error = %restore, "failed to restore live snapshot");
        }
        for (name, (len, existed)) in &before {
            let rollback = if *existed {
                store.table(name).truncate(*len).await
            } else {
                match store.delete_partition(name).await {
                    Err(DatabaseError::NoResult) => Ok(()),
                    other => other,
                }
            };
            if let Err(undo) = rollback {
                tracing::error!(partition = %name, error = %undo, "failed to roll back archive");
            }
        }
        return Err(e);
    }

    Ok(MoveSummary {
        moved: live_before - keep.len(),
        kept: keep.len(),
        archives: before.into_keys().collect(),
    })
}

/// Remove trash rows deleted before `cutoff`. Unparseable stamps are kept.
async fn purge_trash_rows<T: Table>(
    table: &T,
    cutoff: DateTime<Utc>,
) -> Result<PurgeOutcome, StoreError> {
    let rows = table.read_all().await?;
    let before = rows.len();
    let kept: Vec<Row> = rows
        .into_iter()
        .filter(|row| parse_cell_datetime(cell(row, 0)).is_none_or(|deleted| deleted >= cutoff))
        .collect();
    let removed = before - kept.len();
    if removed > 0 {
        table.overwrite_all(&kept).await?;
    }
    Ok(PurgeOutcome {
        partition: table.name().to_string(),
        removed,
        kept: kept.len(),
    })
}

impl CareService {
    /// Move records older than `retention.archive_after_days` out of live.
    ///
    /// Emits `ARCHIVE_MOVE` when rows moved or the move failed; a sweep
    /// with nothing to move is silent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Integrity` when the move was rolled back.
    pub async fn archive_sweep_at(
        &self,
        office: &str,
        now: DateTime<Utc>,
    ) -> Result<SweepOutcome, StoreError> {
        let ctx = AuditContext::system(office);
        let retention = &self.config().retention;
        let threshold = now - TimeDelta::days(retention.archive_after_days);
        let result = async {
            let tenant = self.resolve_tenant(office).await?;
            let store = tenant.records();
            let summary = move_aged_rows(
                &store.table(RECORDS_LIVE),
                store,
                threshold,
                retention.archive_batch_size,
            )
            .await?;
            Ok::<_, StoreError>(SweepOutcome {
                office: tenant.office.clone(),
                moved: summary.moved,
                kept: summary.kept,
                archives: summary.archives,
            })
        }
        .await;

        let draft = AuditDraft::new(AuditAction::ArchiveMove, TargetType::Archive)
            .target(RECORDS_LIVE)
            .target_date(Some(threshold));
        match &result {
            Ok(outcome) if outcome.moved > 0 => {
                tracing::info!(office, moved = outcome.moved, kept = outcome.kept, "archived records");
                let draft = draft
                    .message(format!("moved {} record(s)", outcome.moved))
                    .detail(&ArchiveMoveDetail {
                        moved: outcome.moved,
                        kept: outcome.kept,
                        archives: outcome.archives.clone(),
                    });
                self.record_event(&ctx, draft, AuditStatus::Success).await;
            }
            Ok(_) => tracing::debug!(office, "nothing to archive"),
            Err(e) => self.record_failure(&ctx, draft, e).await,
        }
        result
    }

    /// [`Self::archive_sweep_at`] with the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::archive_sweep_at`].
    pub async fn archive_sweep(&self, office: &str) -> Result<SweepOutcome, StoreError> {
        self.archive_sweep_at(office, Utc::now()).await
    }

    /// Delete archive partitions older than `retention.archive_retention_years`.
    ///
    /// One `ARCHIVE_CLEANUP` event per deleted partition.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` when a partition cannot be listed or
    /// deleted; partitions deleted before the failure stay deleted.
    pub async fn purge_expired_archives(
        &self,
        office: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ArchiveCleanupDetail>, StoreError> {
        let ctx = AuditContext::system(office);
        let oldest_kept = now.year() - self.config().retention.archive_retention_years;
        let tenant = self.resolve_tenant(office).await?;
        let store = tenant.records();

        let mut deleted = Vec::new();
        for name in store.list_partition_names().await? {
            let Some(year) = archive_year(&name) else {
                continue;
            };
            if year >= oldest_kept {
                continue;
            }
            let draft = AuditDraft::new(AuditAction::ArchiveCleanup, TargetType::Archive).target(&name);
            let result = async {
                let rows = store.table(&name).row_count().await?;
                store.delete_partition(&name).await?;
                Ok::<_, StoreError>(ArchiveCleanupDetail {
                    partition: name.clone(),
                    year,
                    rows,
                })
            }
            .await;
            let detail = self.audited(&ctx, draft, result).await?;
            tracing::info!(office, partition = %name, rows = detail.rows, "deleted expired archive");
            deleted.push(detail);
        }
        Ok(deleted)
    }

    /// Purge records trash rows older than `retention.trash_retention_days`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` when the trash cannot be rewritten.
    pub async fn purge_record_trash(
        &self,
        office: &str,
        now: DateTime<Utc>,
    ) -> Result<PurgeOutcome, StoreError> {
        let cutoff = now - TimeDelta::days(self.config().retention.trash_retention_days);
        let result = async {
            let tenant = self.resolve_tenant(office).await?;
            purge_trash_rows(&tenant.records().table(RECORDS_TRASH), cutoff).await
        }
        .await;
        self.audit_purge(office, AuditAction::TrashCleanup, RECORDS_TRASH, &result)
            .await;
        result
    }

    /// Purge incidents trash rows older than `retention.trash_retention_days`.
    ///
    /// Returns `None` for an office without an incidents store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` when the trash cannot be rewritten.
    pub async fn purge_incident_trash(
        &self,
        office: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PurgeOutcome>, StoreError> {
        let cutoff = now - TimeDelta::days(self.config().retention.trash_retention_days);
        let tenant = self.resolve_tenant(office).await?;
        let Ok(store) = tenant.incidents() else {
            return Ok(None);
        };
        let result = purge_trash_rows(&store.table(INCIDENTS_TRASH), cutoff).await;
        self.audit_purge(office, AuditAction::IncidentTrashCleanup, INCIDENTS_TRASH, &result)
            .await;
        result.map(Some)
    }

    async fn audit_purge(
        &self,
        office: &str,
        action: AuditAction,
        partition: &str,
        result: &Result<PurgeOutcome, StoreError>,
    ) {
        let ctx = AuditContext::system(office);
        let draft = AuditDraft::new(action, TargetType::Trash).target(partition);
        match result {
            Ok(outcome) if outcome.removed > 0 => {
                tracing::info!(office, partition, removed = outcome.removed, "purged trash");
                let draft = draft
                    .message(format!("removed {} row(s)", outcome.removed))
                    .detail(&PurgeDetail {
                        partition: outcome.partition.clone(),
                        removed: outcome.removed,
                        kept: outcome.kept,
                    });
                self.record_event(&ctx, draft, AuditStatus::Success).await;
            }
            Ok(_) => {}
            Err(e) => self.record_failure(&ctx, draft, e).await,
        }
    }

    /// Run every retention job for every office, then purge the audit log.
    ///
    /// Offices are processed one at a time. A failing job is logged and
    /// reported but never stops the remaining jobs or offices.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` only when the office list itself
    /// cannot be read.
    pub async fn run_daily_maintenance(
        &self,
        now: DateTime<Utc>,
    ) -> Result<MaintenanceReport, StoreError> {
        let mut report = MaintenanceReport::default();
        for mapping in self.list_offices().await? {
            let office = mapping.office.as_str();

            let sweep = self.archive_sweep_at(office, now).await;
            report.jobs.push(job(office, "archive_sweep", sweep, |s| {
                format!("moved {}, kept {}", s.moved, s.kept)
            }));

            let archives = self.purge_expired_archives(office, now).await;
            report.jobs.push(job(office, "archive_purge", archives, |d| {
                format!("deleted {} archive partition(s)", d.len())
            }));

            let trash = self.purge_record_trash(office, now).await;
            report.jobs.push(job(office, "record_trash_purge", trash, |p| {
                format!("removed {}, kept {}", p.removed, p.kept)
            }));

            let incident_trash = self.purge_incident_trash(office, now).await;
            report.jobs.push(job(office, "incident_trash_purge", incident_trash, |p| {
                p.as_ref().map_or_else(
                    || "no incidents store".to_string(),
                    |p| format!("removed {}, kept {}", p.removed, p.kept),
                )
            }));
        }

        let audit = self.purge_expired_audit_events(now).await;
        let mut audit_job = job("", "audit_purge", audit, |p| {
            format!("removed {}, kept {}", p.removed, p.kept)
        });
        audit_job.office = None;
        report.jobs.push(audit_job);

        tracing::info!(
            jobs = report.jobs.len(),
            failures = report.failures(),
            "daily maintenance finished"
        );
        Ok(report)
    }
}

fn job<T>(
    office: &str,
    name: &str,
    result: Result<T, StoreError>,
    summarize: impl FnOnce(&T) -> String,
) -> JobOutcome {
    match result {
        Ok(value) => JobOutcome {
            office: Some(office.to_string()),
            job: name.to_string(),
            ok: true,
            summary: summarize(&value),
        },
        Err(e) => {
            tracing::error!(office, job = name, kind = %e.kind(), error = %e, "maintenance job failed");
            JobOutcome {
                office: Some(office.to_string()),
                job: name.to_string(),
                ok: false,
                summary: e.user_message(),
            }
        }
    }
}
