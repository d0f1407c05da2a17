//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::IncidentApprove` and `AuditAction::IncidentReturn`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::RecordSave`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordSaveDetail {
    pub users: Vec<String>,
    pub count: usize,
}

/// Detail for `AuditAction::RecordEdit`, `RecordDelete` and `RecordRestore`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RowLocationDetail {
    pub partition: String,
    pub offset: usize,
}

/// Detail for `AuditAction::ArchiveMove`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ArchiveMoveDetail {
    pub moved: usize,
    pub kept: usize,
    pub archives: Vec<String>,
}

/// Detail for `AuditAction::ArchiveCleanup`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ArchiveCleanupDetail {
    pub partition: String,
    pub year: i32,
    pub rows: usize,
}

/// Detail for trash and log purges.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PurgeDetail {
    pub partition: String,
    pub removed: usize,
    pub kept: usize,
}
