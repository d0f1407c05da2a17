//! Shared test utilities for care-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, TimeDelta, Utc};

    use care_auth::{Scope, Session, StaffEntry};
    use care_config::CareConfig;
    use care_core::entities::{IncidentDraft, RecordDraft, Vitals};
    use care_core::enums::{RecordItem, Role};
    use care_core::partitions::STAFF;

    use crate::service::CareService;
    use crate::storage::Table;

    /// Create an in-memory CareService with no offices or staff.
    pub async fn test_service() -> CareService {
        CareService::open(CareConfig::default()).await.unwrap()
    }

    pub fn staff_entry(name: &str, offices: &str, role: &str, pin: &str) -> StaffEntry {
        StaffEntry {
            name: name.to_string(),
            scope: Scope::from_cell(offices),
            role: Role::from_cell(role),
            pin: pin.to_string(),
        }
    }

    /// Offices Alpha, Beta, Gamma (with incidents stores) and Delta
    /// (records only); staff Tanaka (Beta, Gamma) and manager Sato (all).
    pub async fn seeded_service() -> CareService {
        let svc = test_service().await;
        for office in ["Alpha", "Beta", "Gamma"] {
            let lower = office.to_lowercase();
            svc.register_office(
                office,
                &format!("{lower}-records"),
                Some(&format!("{lower}-incidents")),
            )
            .await
            .unwrap();
        }
        svc.register_office("Delta", "delta-records", None)
            .await
            .unwrap();
        svc.master()
            .table(STAFF)
            .append_rows(&[
                staff_entry("Tanaka", "Beta,Gamma", "staff", "1234").to_cells(),
                staff_entry("Sato", "", "manager", "9999").to_cells(),
            ])
            .await
            .unwrap();
        svc
    }

    /// A session built directly, bypassing sign-in.
    pub fn session(name: &str, role: Role, offices: &str, office: &str) -> Session {
        let now = Utc::now();
        Session {
            name: name.to_string(),
            role,
            office_selected: office.to_string(),
            scope: Scope::from_cell(offices),
            issued_at: now,
            expires_at: now + TimeDelta::hours(1),
        }
    }

    pub fn tanaka(office: &str) -> Session {
        session("Tanaka", Role::Staff, "Beta,Gamma", office)
    }

    pub fn sato(office: &str) -> Session {
        session("Sato", Role::Manager, "", office)
    }

    pub fn record_draft(occurred_at: DateTime<Utc>, content: &str) -> RecordDraft {
        RecordDraft {
            occurred_at,
            recorder_name: "Tanaka".to_string(),
            item: RecordItem::Meal,
            detail1: "完食".to_string(),
            detail2: String::new(),
            vitals: Vitals::default(),
            content: content.to_string(),
        }
    }

    pub fn incident_draft(subject: &str, incident_type: &str) -> IncidentDraft {
        IncidentDraft {
            occurred_at: Utc::now() - TimeDelta::hours(2),
            subject_user: subject.to_string(),
            incident_type: incident_type.to_string(),
            place: "食堂".to_string(),
            situation: "椅子から立ち上がる際にふらついた".to_string(),
            cause: "床が濡れていた".to_string(),
            response: "看護師が確認".to_string(),
            prevention: "床の確認を徹底".to_string(),
        }
    }
}
