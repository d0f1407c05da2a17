//! Cross-cutting error types.
//!
//! Domain-specific errors (`DatabaseError`, `AuthError`, `StoreError`) are
//! defined in their respective crates. Every one of them maps onto an
//! [`ErrorKind`] so callers can branch on the failure class without matching
//! on crate-specific variants.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can be raised by any care crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (missing field, malformed token).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } | Self::Validation(_) => ErrorKind::Validation,
            Self::Other(_) => ErrorKind::Upstream,
        }
    }
}

/// Failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Name or PIN did not match.
    Authentication,
    /// Identity is valid but lacks office scope or role.
    Authorization,
    /// A positional row locator no longer points at the same row.
    StaleReference,
    /// Archive row counts did not reconcile; the move was rolled back.
    Integrity,
    /// Storage call failed or timed out.
    Upstream,
    /// Input rejected before any write.
    Validation,
    NotFound,
    /// The office has no store configured for the requested data.
    NotConfigured,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::StaleReference => "stale_reference",
            Self::Integrity => "integrity",
            Self::Upstream => "upstream",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::NotConfigured => "not_configured",
        }
    }

    /// Whether the failure is an internal fault that should not leak details.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Integrity | Self::Upstream)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_is_a_validation_failure() {
        let err = CoreError::InvalidTransition {
            entity_type: "incident".into(),
            id: "abc".into(),
            from: "approved".into(),
            to: "returned".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("from approved to returned"));
    }

    #[test]
    fn internal_kinds() {
        assert!(ErrorKind::Integrity.is_internal());
        assert!(ErrorKind::Upstream.is_internal());
        assert!(!ErrorKind::Authentication.is_internal());
        assert!(!ErrorKind::StaleReference.is_internal());
    }
}
