//! Serialized entities must validate against their generated JSON schemas.

use chrono::{TimeZone, Utc};
use care_core::entities::{IncidentDraft, IncidentReport, RecordDraft, SupportRecord, Vitals};
use care_core::enums::RecordItem;
use care_core::responses::RecordPage;

fn assert_conforms<T: serde::Serialize + schemars::JsonSchema>(value: &T) {
    let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();
    let instance = serde_json::to_value(value).unwrap();
    let errors: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| e.to_string())
        .collect();
    assert!(errors.is_empty(), "schema violations: {errors:?}");
}

#[test]
fn support_record_conforms() {
    let draft = RecordDraft {
        occurred_at: Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap(),
        recorder_name: "佐藤".into(),
        item: RecordItem::Vitals,
        detail1: String::new(),
        detail2: String::new(),
        vitals: Vitals {
            temp: "36.5".into(),
            bp_high: "120".into(),
            bp_low: "80".into(),
            pulse: "70".into(),
            spo2: "98".into(),
            weight: "52.1".into(),
        },
        content: "異常なし".into(),
    };
    let record = SupportRecord::from_draft(&draft, "田中", Utc::now());
    assert_conforms(&record);
}

#[test]
fn incident_report_conforms() {
    let draft = IncidentDraft {
        occurred_at: Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap(),
        subject_user: "山田".into(),
        incident_type: "転倒".into(),
        place: "居室".into(),
        situation: String::new(),
        cause: String::new(),
        response: String::new(),
        prevention: String::new(),
    };
    let mut report = IncidentReport::new("c0ffee".into(), "Tanaka", &draft, Utc::now());
    report.approve("Sato", Utc::now());
    assert_conforms(&report);
}

#[test]
fn empty_record_page_conforms() {
    let page = RecordPage {
        records: Vec::new(),
        has_more: false,
        continuation: None,
    };
    assert_conforms(&page);
}
