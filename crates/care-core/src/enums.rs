//! Status enums, roles, record items, and audit actions.
//!
//! Every enum that is persisted into a partition cell exposes `as_str()`
//! returning the stored spelling, and a lenient `from_cell()` for reading
//! rows written by older clients.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RecordItem
// ---------------------------------------------------------------------------

/// Category of a daily support record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RecordItem {
    #[serde(rename = "排泄")]
    Excretion,
    #[serde(rename = "食事")]
    Meal,
    #[serde(rename = "バイタル")]
    Vitals,
    #[serde(rename = "服薬")]
    Medication,
    #[serde(rename = "その他")]
    Other,
}

impl RecordItem {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excretion => "排泄",
            Self::Meal => "食事",
            Self::Vitals => "バイタル",
            Self::Medication => "服薬",
            Self::Other => "その他",
        }
    }

    /// Read a stored item cell. Unknown categories fall into `Other`.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim() {
            "排泄" => Self::Excretion,
            "食事" => Self::Meal,
            "バイタル" => Self::Vitals,
            "服薬" => Self::Medication,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for RecordItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// IncidentStatus
// ---------------------------------------------------------------------------

/// Approval status of an incident report.
///
/// ```text
/// create → pending → approved
///                  → returned → approved
/// edit: any → pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Pending,
    Approved,
    Returned,
}

impl IncidentStatus {
    /// Valid next states from the current state.
    ///
    /// `Pending` is always reachable because an edit invalidates any prior
    /// disposition.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Pending, Self::Approved, Self::Returned],
            Self::Returned => &[Self::Pending, Self::Approved],
            Self::Approved => &[Self::Pending],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Canonical spelling written to the status column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "未承認",
            Self::Approved => "承認済",
            Self::Returned => "差戻し",
        }
    }

    /// Read a status cell, accepting the spellings older clients wrote.
    ///
    /// An empty cell is `Pending`. Anything unrecognized is `None`.
    #[must_use]
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "" | "未承認" | "pending" => Some(Self::Pending),
            "承認済" | "承認済み" | "approved" => Some(Self::Approved),
            "差戻し" | "差戻" | "差し戻し" | "returned" => Some(Self::Returned),
            _ => None,
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Staff role. Only managers may approve or return incident reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Staff,
    Manager,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Manager => "manager",
        }
    }

    /// Read the role cell of the staff directory. Blank or unknown roles are `Staff`.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().eq_ignore_ascii_case("manager") {
            Self::Manager
        } else {
            Self::Staff
        }
    }

    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    RecordSave,
    RecordEdit,
    RecordDelete,
    RecordRestore,
    #[serde(rename = "ADD_INCIDENT")]
    IncidentAdd,
    IncidentUpdate,
    IncidentApprove,
    IncidentReturn,
    IncidentTrash,
    IncidentRestore,
    ArchiveMove,
    ArchiveCleanup,
    TrashCleanup,
    IncidentTrashCleanup,
    LogCleanup,
    SigninSuccess,
    SigninDenied,
    PinFail,
}

impl AuditAction {
    pub const ALL: [Self; 18] = [
        Self::RecordSave,
        Self::RecordEdit,
        Self::RecordDelete,
        Self::RecordRestore,
        Self::IncidentAdd,
        Self::IncidentUpdate,
        Self::IncidentApprove,
        Self::IncidentReturn,
        Self::IncidentTrash,
        Self::IncidentRestore,
        Self::ArchiveMove,
        Self::ArchiveCleanup,
        Self::TrashCleanup,
        Self::IncidentTrashCleanup,
        Self::LogCleanup,
        Self::SigninSuccess,
        Self::SigninDenied,
        Self::PinFail,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecordSave => "RECORD_SAVE",
            Self::RecordEdit => "RECORD_EDIT",
            Self::RecordDelete => "RECORD_DELETE",
            Self::RecordRestore => "RECORD_RESTORE",
            Self::IncidentAdd => "ADD_INCIDENT",
            Self::IncidentUpdate => "INCIDENT_UPDATE",
            Self::IncidentApprove => "INCIDENT_APPROVE",
            Self::IncidentReturn => "INCIDENT_RETURN",
            Self::IncidentTrash => "INCIDENT_TRASH",
            Self::IncidentRestore => "INCIDENT_RESTORE",
            Self::ArchiveMove => "ARCHIVE_MOVE",
            Self::ArchiveCleanup => "ARCHIVE_CLEANUP",
            Self::TrashCleanup => "TRASH_CLEANUP",
            Self::IncidentTrashCleanup => "INCIDENT_TRASH_CLEANUP",
            Self::LogCleanup => "LOG_CLEANUP",
            Self::SigninSuccess => "SIGNIN_SUCCESS",
            Self::SigninDenied => "SIGNIN_DENIED",
            Self::PinFail => "PIN_FAIL",
        }
    }

    #[must_use]
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        Self::ALL.into_iter().find(|action| action.as_str() == cell)
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditStatus
// ---------------------------------------------------------------------------

/// Outcome recorded with an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    #[default]
    Success,
    Error,
}

impl AuditStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }

    /// Blank cells were written as successes by older clients.
    #[must_use]
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "" | "SUCCESS" => Some(Self::Success),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TargetType
// ---------------------------------------------------------------------------

/// Kind of object an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Record,
    Incident,
    Archive,
    Trash,
    Log,
    Auth,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Record => "RECORD",
            Self::Incident => "INCIDENT",
            Self::Archive => "ARCHIVE",
            Self::Trash => "TRASH",
            Self::Log => "LOG",
            Self::Auth => "AUTH",
        }
    }

    #[must_use]
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "RECORD" => Some(Self::Record),
            "INCIDENT" => Some(Self::Incident),
            "ARCHIVE" => Some(Self::Archive),
            "TRASH" => Some(Self::Trash),
            "LOG" => Some(Self::Log),
            "AUTH" => Some(Self::Auth),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
