//! Failures raised while loading `CareConfig`.

use thiserror::Error;

/// Why the layered configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `CARE_*` variable could not be read into the config shape.
    #[error("failed to read care configuration: {0}")]
    Source(#[from] figment::Error),

    /// A setting the stores cannot start without was left blank.
    #[error("care setting '{field}' must not be blank")]
    MissingValue { field: String },

    /// A retention, session or paging value outside its allowed range.
    #[error("care setting '{field}' is out of range: {reason}")]
    OutOfRange { field: String, reason: String },
}
