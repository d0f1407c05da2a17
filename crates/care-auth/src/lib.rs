//! # care-auth
//!
//! PIN-based sign-in for the care record store.
//!
//! Verification is a linear scan of the staff directory requiring an exact
//! name and an exact PIN. The directory itself lives in the master store;
//! this crate only holds the pure decision logic so it can be reused for the
//! step-up check performed before approving or returning an incident report.

pub mod error;
pub mod scope;
pub mod session;
pub mod staff;

pub use error::AuthError;
pub use scope::Scope;
pub use session::{PinIdentity, Session};
pub use staff::StaffEntry;

use chrono::{DateTime, TimeDelta, Utc};

/// Verify `name` + `pin` and bind the identity to `office`.
///
/// # Errors
///
/// Returns `AuthError::Authentication` when no entry matches both name and
/// PIN, or `AuthError::OfficeNotAuthorized` when the matching entry's scope
/// does not cover `office`.
pub fn verify_credentials(
    staff: &[StaffEntry],
    office: &str,
    name: &str,
    pin: &str,
    now: DateTime<Utc>,
    ttl: TimeDelta,
) -> Result<Session, AuthError> {
    verify_pin_only(staff, name, pin)?.select_office(office, now, ttl)
}

/// Verify `name` + `pin` without choosing an office.
///
/// # Errors
///
/// Returns `AuthError::Authentication` when no entry matches both.
pub fn verify_pin_only(
    staff: &[StaffEntry],
    name: &str,
    pin: &str,
) -> Result<PinIdentity, AuthError> {
    let entry = staff::find(staff, name, pin).ok_or_else(|| {
        tracing::debug!(name, "no staff entry matched name and PIN");
        AuthError::Authentication
    })?;
    Ok(PinIdentity {
        name: entry.name.clone(),
        role: entry.role,
        scope: entry.scope.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use care_core::enums::Role;
    use care_core::errors::ErrorKind;
    use rstest::rstest;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| (*s).to_string()).collect()
    }

    fn directory() -> Vec<StaffEntry> {
        [
            row(&["Tanaka", "Beta,Gamma", "staff", "1234"]),
            row(&["Sato", "", "manager", "9999"]),
            row(&["", "Beta", "staff", "0000"]),
            row(&["Suzuki", "Beta", "", ""]),
        ]
        .iter()
        .filter_map(|cells| StaffEntry::from_cells(cells))
        .collect()
    }

    #[test]
    fn authorized_office_succeeds() {
        let now = Utc::now();
        let session =
            verify_credentials(&directory(), "Beta", "Tanaka", "1234", now, TimeDelta::hours(1))
                .unwrap();
        assert_eq!(session.name, "Tanaka");
        assert_eq!(session.role, Role::Staff);
        assert_eq!(session.office_selected, "Beta");
        assert_eq!(session.expires_at, now + TimeDelta::hours(1));
    }

    #[test]
    fn unlisted_office_is_an_authorization_failure() {
        let err = verify_credentials(
            &directory(),
            "Delta",
            "Tanaka",
            "1234",
            Utc::now(),
            TimeDelta::hours(1),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(err.to_string().contains("Delta"));
    }

    #[rstest]
    #[case("Tanaka", "4321")]
    #[case("Tanak", "1234")]
    #[case("tanaka", "1234")]
    #[case("Suzuki", "")]
    #[case("", "0000")]
    fn mismatch_is_a_generic_authentication_failure(#[case] name: &str, #[case] pin: &str) {
        let err = verify_credentials(
            &directory(),
            "Beta",
            name,
            pin,
            Utc::now(),
            TimeDelta::hours(1),
        )
        .unwrap_err();
        assert_eq!(err, AuthError::Authentication);
        let message = err.to_string();
        assert!(message.contains("name or PIN"));
    }

    #[test]
    fn blank_offices_cell_authorizes_every_office() {
        let session = verify_credentials(
            &directory(),
            "Anywhere",
            "Sato",
            "9999",
            Utc::now(),
            TimeDelta::hours(1),
        )
        .unwrap();
        assert_eq!(session.scope, Scope::AllOffices);
        assert_eq!(session.role, Role::Manager);
    }

    #[test]
    fn pin_only_returns_scope_without_office() {
        let identity = verify_pin_only(&directory(), "Tanaka", "1234").unwrap();
        assert_eq!(identity.scope, Scope::from_cell("Beta,Gamma"));
        assert!(verify_pin_only(&directory(), "Tanaka", "0000").is_err());
    }
}
