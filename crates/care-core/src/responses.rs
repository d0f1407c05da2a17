//! Response types returned by queries and maintenance jobs.
//!
//! These structs define the JSON shape printed by the `care` binary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{IncidentEntry, RecordEntry};
use crate::pagination::ContinuationToken;

/// One page of support records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<RecordEntry>,
    pub has_more: bool,
    #[schemars(with = "Option<String>")]
    pub continuation: Option<ContinuationToken>,
}

/// One page of the pending-work list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PendingPage {
    pub items: Vec<IncidentEntry>,
    pub total: usize,
    pub has_more: bool,
}

/// One page of approved incident history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryPage {
    pub items: Vec<IncidentEntry>,
    pub has_more: bool,
    #[schemars(with = "Option<String>")]
    pub continuation: Option<ContinuationToken>,
}

/// Result of one archive sweep.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SweepOutcome {
    pub office: String,
    pub moved: usize,
    pub kept: usize,
    /// Archive partitions written to, one per occurrence year moved.
    pub archives: Vec<String>,
}

/// Result of one purge job.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub partition: String,
    pub removed: usize,
    pub kept: usize,
}

/// Outcome of one maintenance job for one office.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobOutcome {
    /// `None` for jobs that are not tenant-scoped (audit purge).
    pub office: Option<String>,
    pub job: String,
    pub ok: bool,
    pub summary: String,
}

/// Report of a full maintenance run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub jobs: Vec<JobOutcome>,
}

impl MaintenanceReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.jobs.iter().filter(|job| !job.ok).count()
    }
}
