//! File-backed store integration tests.
//!
//! Exercise the public service API against one database file per store:
//! - office registration and staff sign-in survive a reopen
//! - records written before an archive sweep page identically afterwards
//! - audit events land in the master store

use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use care_auth::{Scope, StaffEntry};
use care_config::CareConfig;
use care_core::entities::{RecordDraft, Vitals};
use care_core::enums::{AuditAction, RecordItem, Role};
use care_db::repos::{AuditFilter, RecordQuery};
use care_db::service::CareService;

fn config_in(dir: &TempDir) -> CareConfig {
    let mut config = CareConfig::default();
    config.storage.data_dir = dir.path().to_string_lossy().into_owned();
    config
}

fn draft(days_ago: i64, content: &str) -> RecordDraft {
    RecordDraft {
        occurred_at: Utc::now() - TimeDelta::days(days_ago),
        recorder_name: "Tanaka".to_string(),
        item: RecordItem::Meal,
        detail1: String::new(),
        detail2: String::new(),
        vitals: Vitals::default(),
        content: content.to_string(),
    }
}

async fn contents(svc: &CareService, limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut query = RecordQuery {
        limit,
        ..RecordQuery::default()
    };
    loop {
        let page = svc.get_records("Alpha", &query).await.unwrap();
        out.extend(page.records.into_iter().map(|e| e.record.content));
        match page.continuation {
            Some(token) => query.continuation = Some(token),
            None => return out,
        }
    }
}

#[tokio::test]
async fn offices_staff_and_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let svc = CareService::open(config_in(&dir)).await.unwrap();
        svc.register_office("Alpha", "alpha-records", Some("alpha-incidents"))
            .await
            .unwrap();
        svc.add_staff(&StaffEntry {
            name: "Tanaka".to_string(),
            scope: Scope::from_cell("Alpha"),
            role: Role::Staff,
            pin: "1234".to_string(),
        })
        .await
        .unwrap();
        let session = svc.sign_in("Alpha", "Tanaka", "1234").await.unwrap();
        svc.add_records(
            &session,
            "Alpha",
            &draft(1, "breakfast"),
            &["Suzuki".to_string()],
        )
        .await
        .unwrap();
    }

    assert!(dir.path().join("master.db").exists());
    assert!(dir.path().join("alpha-records.db").exists());

    let svc = CareService::open(config_in(&dir)).await.unwrap();
    let offices = svc.list_offices().await.unwrap();
    assert_eq!(offices.len(), 1);
    assert_eq!(offices[0].incidents_store.as_deref(), Some("alpha-incidents"));
    assert!(svc.sign_in("Alpha", "Tanaka", "1234").await.is_ok());
    assert_eq!(contents(&svc, 10).await, vec!["breakfast"]);
}

#[tokio::test]
async fn paging_is_unchanged_by_an_archive_sweep() {
    let dir = TempDir::new().unwrap();
    let svc = CareService::open(config_in(&dir)).await.unwrap();
    svc.register_office("Alpha", "alpha-records", None)
        .await
        .unwrap();
    svc.add_staff(&StaffEntry {
        name: "Tanaka".to_string(),
        scope: Scope::AllOffices,
        role: Role::Manager,
        pin: "4321".to_string(),
    })
    .await
    .unwrap();
    let session = svc.sign_in("Alpha", "Tanaka", "4321").await.unwrap();

    // appended oldest first so live order matches occurrence order
    for (days_ago, content) in [(800, "a"), (420, "b"), (200, "c"), (30, "d"), (2, "e")] {
        svc.add_records(&session, "Alpha", &draft(days_ago, content), &["Suzuki".to_string()])
            .await
            .unwrap();
    }
    let before = contents(&svc, 2).await;
    assert_eq!(before, vec!["e", "d", "c", "b", "a"]);

    let outcome = svc.archive_sweep("Alpha").await.unwrap();
    assert_eq!(outcome.moved, 3);
    assert_eq!(outcome.kept, 2);

    assert_eq!(contents(&svc, 2).await, before);
    assert_eq!(contents(&svc, 1).await, before);

    let moves = svc
        .query_audit(&AuditFilter {
            action: Some(AuditAction::ArchiveMove),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].office_selected, "Alpha");
}
