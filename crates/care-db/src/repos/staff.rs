//! Staff directory and sign-in.
//!
//! The `staff` partition of the master store holds `[name, offices, role,
//! pin]` rows. Verification itself is pure and lives in `care-auth`; this
//! module loads the directory, audits sign-in attempts and performs the
//! step-up check used before approving or returning an incident report.

use chrono::Utc;

use care_auth::{PinIdentity, Session, StaffEntry, verify_pin_only};
use care_core::entities::AuditContext;
use care_core::enums::{AuditAction, AuditStatus, TargetType};
use care_core::partitions::STAFF;

use crate::error::StoreError;
use crate::repos::audit::AuditDraft;
use crate::service::CareService;
use crate::storage::Table;

impl CareService {
    /// Every staff entry with a non-blank name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the master store cannot be read.
    pub async fn staff_directory(&self) -> Result<Vec<StaffEntry>, StoreError> {
        let rows = self.master().table(STAFF).read_all().await?;
        Ok(rows
            .iter()
            .filter_map(|cells| StaffEntry::from_cells(cells))
            .collect())
    }

    /// Add a staff member.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank or duplicate name, or a PIN that is
    /// not exactly `session.pin_length` ASCII digits.
    pub async fn add_staff(&self, entry: &StaffEntry) -> Result<(), StoreError> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("staff name must not be blank"));
        }
        let pin_length = self.config().session.pin_length;
        if entry.pin.len() != pin_length || !entry.pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StoreError::validation(format!(
                "PIN must be exactly {pin_length} digits"
            )));
        }
        if self.staff_directory().await?.iter().any(|s| s.name == name) {
            return Err(StoreError::validation(format!(
                "staff member '{name}' already exists"
            )));
        }
        self.master()
            .table(STAFF)
            .append_rows(&[entry.to_cells()])
            .await?;
        Ok(())
    }

    /// Verify name + PIN and open a session for `office`.
    ///
    /// Emits `SIGNIN_SUCCESS`, `SIGNIN_DENIED` (valid identity, office
    /// outside scope) or `PIN_FAIL`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` or `AuthError::OfficeNotAuthorized`.
    pub async fn sign_in(&self, office: &str, name: &str, pin: &str) -> Result<Session, StoreError> {
        let staff = self.staff_directory().await?;
        let attempt = AuditContext {
            executor: name.to_string(),
            role: String::new(),
            offices_authorized: String::new(),
            office_selected: office.trim().to_string(),
        };

        let identity = match verify_pin_only(&staff, name, pin) {
            Ok(identity) => identity,
            Err(e) => {
                let err = StoreError::from(e);
                let draft = AuditDraft::new(AuditAction::PinFail, TargetType::Auth).target(name);
                self.record_failure(&attempt, draft, &err).await;
                return Err(err);
            }
        };

        let ctx = AuditContext {
            role: identity.role.as_str().to_string(),
            offices_authorized: identity.scope.to_cell(),
            ..attempt
        };
        match identity.select_office(office, Utc::now(), self.session_ttl()) {
            Ok(session) => {
                let draft = AuditDraft::new(AuditAction::SigninSuccess, TargetType::Auth)
                    .target(name)
                    .message("signed in");
                self.record_event(&ctx, draft, AuditStatus::Success).await;
                Ok(session)
            }
            Err(e) => {
                let err = StoreError::from(e);
                let draft = AuditDraft::new(AuditAction::SigninDenied, TargetType::Auth).target(name);
                self.record_failure(&ctx, draft, &err).await;
                Err(err)
            }
        }
    }

    /// Verify name + PIN without choosing an office.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Authentication` on mismatch.
    pub async fn verify_pin(&self, name: &str, pin: &str) -> Result<PinIdentity, StoreError> {
        let staff = self.staff_directory().await?;
        Ok(verify_pin_only(&staff, name, pin)?)
    }

    /// Re-verify the session holder's PIN against the current directory.
    ///
    /// Returns a fresh session so that a role or scope change since sign-in
    /// takes effect immediately.
    pub(crate) async fn step_up(
        &self,
        session: &Session,
        office: &str,
        pin: &str,
    ) -> Result<Session, StoreError> {
        let identity = self.verify_pin(&session.name, pin).await?;
        Ok(identity.select_office(office, Utc::now(), self.session_ttl())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{seeded_service, staff_entry};
    use care_core::enums::Role;
    use care_core::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    async fn last_action(svc: &CareService) -> (AuditAction, AuditStatus) {
        let events = svc
            .query_audit(&AuditFilter {
                limit: Some(1),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        (events[0].action, events[0].status)
    }

    #[tokio::test]
    async fn delta_sign_in_is_denied_and_audited() {
        let svc = seeded_service().await;
        let err = svc.sign_in("Delta", "Tanaka", "1234").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(err.user_message().contains("Delta"));
        assert_eq!(
            last_action(&svc).await,
            (AuditAction::SigninDenied, AuditStatus::Error)
        );
    }

    #[tokio::test]
    async fn wrong_pin_is_pin_fail() {
        let svc = seeded_service().await;
        let err = svc.sign_in("Beta", "Tanaka", "0000").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(
            last_action(&svc).await,
            (AuditAction::PinFail, AuditStatus::Error)
        );
    }

    #[tokio::test]
    async fn successful_sign_in_uses_configured_window() {
        let svc = seeded_service().await;
        let session = svc.sign_in("Gamma", "Tanaka", "1234").await.unwrap();
        assert_eq!(session.office_selected, "Gamma");
        assert_eq!(session.role, Role::Staff);
        assert_eq!(
            session.expires_at - session.issued_at,
            chrono::TimeDelta::minutes(60)
        );
        assert_eq!(
            last_action(&svc).await,
            (AuditAction::SigninSuccess, AuditStatus::Success)
        );
    }

    #[tokio::test]
    async fn add_staff_validates_pin_and_duplicates() {
        let svc = seeded_service().await;
        let short = svc.add_staff(&staff_entry("Suzuki", "Beta", "staff", "12")).await;
        assert_eq!(short.unwrap_err().kind(), ErrorKind::Validation);
        let dup = svc.add_staff(&staff_entry("Tanaka", "Beta", "staff", "5678")).await;
        assert_eq!(dup.unwrap_err().kind(), ErrorKind::Validation);

        svc.add_staff(&staff_entry("Suzuki", "Beta", "staff", "5678"))
            .await
            .unwrap();
        let identity = svc.verify_pin("Suzuki", "5678").await.unwrap();
        assert_eq!(identity.name, "Suzuki");
    }
}
