use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use care_core::entities::AuditContext;
use care_core::enums::Role;

use crate::error::AuthError;
use crate::scope::Scope;

/// A verified identity bound to one office.
///
/// Expiry is advisory: stores never check it, and high-trust transitions
/// re-verify the PIN regardless of how fresh the session is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub role: Role,
    pub office_selected: String,
    pub scope: Scope,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Require the session scope to cover `office`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OfficeNotAuthorized` otherwise.
    pub fn ensure_office(&self, office: &str) -> Result<(), AuthError> {
        if self.scope.allows(office) {
            Ok(())
        } else {
            Err(AuthError::OfficeNotAuthorized {
                office: office.trim().to_string(),
            })
        }
    }

    /// Require the manager role for `action`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RoleRequired` for staff.
    pub fn ensure_manager(&self, action: &str) -> Result<(), AuthError> {
        if self.role.is_manager() {
            Ok(())
        } else {
            Err(AuthError::RoleRequired {
                role: Role::Manager.as_str().to_string(),
                action: action.to_string(),
            })
        }
    }

    /// Audit columns describing this actor.
    #[must_use]
    pub fn audit_context(&self, office: &str) -> AuditContext {
        AuditContext {
            executor: self.name.clone(),
            role: self.role.as_str().to_string(),
            offices_authorized: self.scope.to_cell(),
            office_selected: office.trim().to_string(),
        }
    }
}

/// Identity verified by name and PIN alone, with no office chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinIdentity {
    pub name: String,
    pub role: Role,
    pub scope: Scope,
}

impl PinIdentity {
    /// Bind the identity to an office the caller chose explicitly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::OfficeNotAuthorized` if `office` is outside the scope.
    pub fn select_office(
        self,
        office: &str,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<Session, AuthError> {
        if !self.scope.allows(office) {
            return Err(AuthError::OfficeNotAuthorized {
                office: office.trim().to_string(),
            });
        }
        Ok(Session {
            name: self.name,
            role: self.role,
            office_selected: office.trim().to_string(),
            scope: self.scope,
            issued_at: now,
            expires_at: now + ttl,
        })
    }
}
