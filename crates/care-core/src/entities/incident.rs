use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::IncidentStatus;

/// Caller-supplied content of an incident report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IncidentDraft {
    pub occurred_at: DateTime<Utc>,
    pub subject_user: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub situation: String,
    #[serde(default)]
    pub cause: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub prevention: String,
}

/// An incident report row.
///
/// `id` is the durable identity. Timestamps are optional because rows
/// written by older clients may carry cells that no longer parse.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IncidentReport {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub recorder: String,
    pub subject_user: String,
    #[serde(rename = "type")]
    pub incident_type: String,
    pub place: String,
    pub situation: String,
    pub cause: String,
    pub response: String,
    pub prevention: String,
    pub status: IncidentStatus,
    pub approver: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub return_reason: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl IncidentReport {
    /// A freshly filed report. Always starts `Pending`.
    #[must_use]
    pub fn new(id: String, recorder: &str, draft: &IncidentDraft, now: DateTime<Utc>) -> Self {
        let mut report = Self {
            id,
            created_at: Some(now),
            occurred_at: None,
            recorder: recorder.to_string(),
            subject_user: String::new(),
            incident_type: String::new(),
            place: String::new(),
            situation: String::new(),
            cause: String::new(),
            response: String::new(),
            prevention: String::new(),
            status: IncidentStatus::Pending,
            approver: None,
            approved_at: None,
            return_reason: None,
            returned_at: None,
        };
        report.apply_draft(draft);
        report
    }

    /// Overwrite the business fields and reset to `Pending`.
    ///
    /// Any edit invalidates a prior approval or return.
    pub fn apply_draft(&mut self, draft: &IncidentDraft) {
        self.occurred_at = Some(draft.occurred_at);
        self.subject_user.clone_from(&draft.subject_user);
        self.incident_type.clone_from(&draft.incident_type);
        self.place.clone_from(&draft.place);
        self.situation.clone_from(&draft.situation);
        self.cause.clone_from(&draft.cause);
        self.response.clone_from(&draft.response);
        self.prevention.clone_from(&draft.prevention);
        self.reset_disposition();
    }

    pub fn approve(&mut self, approver: &str, now: DateTime<Utc>) {
        self.status = IncidentStatus::Approved;
        self.approver = Some(approver.to_string());
        self.approved_at = Some(now);
        self.return_reason = None;
        self.returned_at = None;
    }

    pub fn send_back(&mut self, reason: &str, now: DateTime<Utc>) {
        self.status = IncidentStatus::Returned;
        self.return_reason = Some(reason.to_string());
        self.returned_at = Some(now);
        self.approver = None;
        self.approved_at = None;
    }

    fn reset_disposition(&mut self) {
        self.status = IncidentStatus::Pending;
        self.approver = None;
        self.approved_at = None;
        self.return_reason = None;
        self.returned_at = None;
    }
}

/// An incident report with its current row offset.
///
/// The offset is only valid until the next structural change to the
/// partition; mutations always re-resolve by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IncidentEntry {
    pub offset: usize,
    pub report: IncidentReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> IncidentDraft {
        IncidentDraft {
            occurred_at: Utc.with_ymd_and_hms(2026, 5, 1, 14, 0, 0).unwrap(),
            subject_user: "山田".into(),
            incident_type: "転倒".into(),
            place: "食堂".into(),
            situation: "椅子から立ち上がる際に転倒".into(),
            cause: "床が濡れていた".into(),
            response: "看護師が確認".into(),
            prevention: "床の確認を徹底".into(),
        }
    }

    #[test]
    fn new_report_is_pending() {
        let report = IncidentReport::new("id-1".into(), "Tanaka", &draft(), Utc::now());
        assert_eq!(report.status, IncidentStatus::Pending);
        assert!(report.approver.is_none());
        assert_eq!(report.recorder, "Tanaka");
    }

    #[test]
    fn edit_after_approve_clears_disposition() {
        let mut report = IncidentReport::new("id-1".into(), "Tanaka", &draft(), Utc::now());
        report.approve("Sato", Utc::now());
        assert_eq!(report.status, IncidentStatus::Approved);

        report.apply_draft(&draft());
        assert_eq!(report.status, IncidentStatus::Pending);
        assert!(report.approver.is_none());
        assert!(report.approved_at.is_none());
    }

    #[test]
    fn edit_after_return_clears_disposition() {
        let mut report = IncidentReport::new("id-1".into(), "Tanaka", &draft(), Utc::now());
        report.send_back("場所を詳しく", Utc::now());
        assert_eq!(report.status, IncidentStatus::Returned);

        report.apply_draft(&draft());
        assert_eq!(report.status, IncidentStatus::Pending);
        assert!(report.return_reason.is_none());
        assert!(report.returned_at.is_none());
    }

    #[test]
    fn approve_clears_return_fields() {
        let mut report = IncidentReport::new("id-1".into(), "Tanaka", &draft(), Utc::now());
        report.send_back("追記してください", Utc::now());
        report.approve("Sato", Utc::now());
        assert!(report.return_reason.is_none());
        assert!(report.returned_at.is_none());
        assert_eq!(report.approver.as_deref(), Some("Sato"));
    }

    #[test]
    fn draft_type_field_serializes_as_type() {
        let json = serde_json::to_value(draft()).unwrap();
        assert_eq!(json["type"], "転倒");
    }
}
