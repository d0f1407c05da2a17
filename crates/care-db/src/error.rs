//! Error types for care-db.
//!
//! `DatabaseError` covers storage calls. `StoreError` is what every public
//! `CareService` operation returns; it folds storage, auth and core errors
//! into one enum with an [`ErrorKind`].

use std::time::Duration;

use thiserror::Error;

use care_auth::AuthError;
use care_core::errors::{CoreError, ErrorKind};

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a stored value could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad store id).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A storage call did not finish within the configured bound.
    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether retrying the same idempotent call may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::LibSql(e) => crate::retry::is_transient_libsql_error(e),
            _ => false,
        }
    }
}

/// Errors surfaced by `CareService` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// The row at a positional locator is gone or is a different row.
    #[error("row {offset} of '{partition}' no longer matches; reload and retry")]
    StaleReference { partition: String, offset: usize },

    /// Archive row counts did not reconcile. The move was rolled back.
    #[error(
        "integrity check failed for '{partition}': expected {expected} rows, found {actual}"
    )]
    Integrity {
        partition: String,
        expected: usize,
        actual: usize,
    },

    #[error("office '{office}' has no {store} store configured")]
    NotConfigured { office: String, store: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl StoreError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(e) => e.kind(),
            Self::Core(e) => e.kind(),
            Self::StaleReference { .. } => ErrorKind::StaleReference,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::NotConfigured { .. } => ErrorKind::NotConfigured,
            Self::Database(_) => ErrorKind::Upstream,
        }
    }

    /// Short text safe to show an end user.
    ///
    /// Internal failures get a generic message; the detail stays in the
    /// audit log and the tracing output.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Integrity => {
                "The archive job could not be completed and was rolled back. Contact an administrator."
                    .to_string()
            }
            ErrorKind::Upstream => {
                "The data store is temporarily unavailable. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::Core(CoreError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }

    pub(crate) fn stale(partition: &str, offset: usize) -> Self {
        Self::StaleReference {
            partition: partition.to_string(),
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_transient() {
        assert!(DatabaseError::Timeout(Duration::from_millis(10)).is_transient());
        assert!(!DatabaseError::NoResult.is_transient());
        assert!(!DatabaseError::Query("bad".into()).is_transient());
    }

    #[test]
    fn internal_failures_hide_details() {
        let err = StoreError::Integrity {
            partition: "records".into(),
            expected: 10,
            actual: 9,
        };
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(!err.user_message().contains("expected"));

        let err = StoreError::from(DatabaseError::Query("secret table layout".into()));
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(!err.user_message().contains("secret"));
    }

    #[test]
    fn auth_failures_are_actionable() {
        let err = StoreError::from(AuthError::OfficeNotAuthorized {
            office: "Delta".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(err.user_message().contains("Delta"));
    }
}
