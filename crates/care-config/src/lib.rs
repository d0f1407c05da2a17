//! # care-config
//!
//! Layered configuration loading for the care record store using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CARE_*` prefix, `__` as separator)
//! 2. Project-level `.care/config.toml`
//! 3. User-level `~/.config/care/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CARE_STORAGE__DATA_DIR` -> `storage.data_dir`,
//! `CARE_RETENTION__ARCHIVE_AFTER_DAYS` -> `retention.archive_after_days`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use care_config::CareConfig;
//!
//! let config = CareConfig::load_with_dotenv().expect("config");
//! if config.storage.is_persistent() {
//!     println!("stores live in {}", config.storage.data_dir);
//! }
//! ```

mod error;
mod pagination;
mod retention;
mod session;
mod storage;

pub use error::ConfigError;
pub use pagination::PaginationConfig;
pub use retention::RetentionConfig;
pub use session::SessionConfig;
pub use storage::StorageConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CareConfig {
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CareConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".care/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CARE_").split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retention.validate()?;
        if self.session.session_minutes <= 0 {
            return Err(ConfigError::OutOfRange {
                field: "session.session_minutes".to_string(),
                reason: format!("must be positive, got {}", self.session.session_minutes),
            });
        }
        if self.pagination.pending_max_limit == 0 {
            return Err(ConfigError::OutOfRange {
                field: "pagination.pending_max_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.storage.master_store.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                field: "storage.master_store".to_string(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("care").join("config.toml"))
    }
}
