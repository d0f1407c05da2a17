use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, AuditStatus, TargetType};

/// Version written to the `schema_version` column.
pub const AUDIT_SCHEMA_VERSION: &str = "1.0";

/// One row of the append-only audit log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub schema_version: String,
    pub executor: String,
    pub role: String,
    pub offices_authorized: String,
    pub office_selected: String,
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: String,
    pub target_date: String,
    pub status: AuditStatus,
    pub message: String,
    pub detail: Option<serde_json::Value>,
    pub client_info: String,
    pub request_id: String,
    pub expires_at: DateTime<Utc>,
    pub search_index: String,
}

/// Who performed an audited operation.
///
/// Batch jobs run as [`AuditContext::system`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditContext {
    pub executor: String,
    pub role: String,
    pub offices_authorized: String,
    pub office_selected: String,
}

impl AuditContext {
    #[must_use]
    pub fn system(office: &str) -> Self {
        Self {
            executor: "System".to_string(),
            role: String::new(),
            offices_authorized: String::new(),
            office_selected: office.to_string(),
        }
    }
}
