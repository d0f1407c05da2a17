use thiserror::Error;

use care_core::errors::ErrorKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Never says whether the name or the PIN was wrong.
    #[error("sign-in failed: name or PIN is incorrect")]
    Authentication,

    #[error("not authorized for office '{office}'")]
    OfficeNotAuthorized { office: String },

    #[error("the '{role}' role is required to {action}")]
    RoleRequired { role: String, action: String },

    #[error("only the original recorder or a manager may {action}")]
    NotRecorder { action: String },
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication => ErrorKind::Authentication,
            Self::OfficeNotAuthorized { .. }
            | Self::RoleRequired { .. }
            | Self::NotRecorder { .. } => ErrorKind::Authorization,
        }
    }
}
