//! Service layer tying stores, configuration and the audit log together.
//!
//! `CareService` owns the master store and the store provider. All public
//! operations are implemented as `impl CareService` blocks in the repo,
//! audit, tenant and archive modules. Every mutating operation writes exactly
//! one audit event at its public boundary.

use std::sync::Arc;

use chrono::TimeDelta;
use care_config::CareConfig;

use crate::CareDb;
use crate::error::DatabaseError;
use crate::tenant::StoreProvider;

pub struct CareService {
    master: Arc<CareDb>,
    stores: StoreProvider,
    config: CareConfig,
}

impl CareService {
    /// Open the master store named in `config.storage`.
    ///
    /// With an empty `storage.data_dir` every store is in-memory and lives as
    /// long as the service.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the master store cannot be opened.
    pub async fn open(config: CareConfig) -> Result<Self, DatabaseError> {
        let stores = StoreProvider::new(config.storage.clone());
        let master = stores.open(&config.storage.master_store).await?;
        tracing::debug!(
            master = %config.storage.master_store,
            persistent = config.storage.is_persistent(),
            "opened care service"
        );
        Ok(Self {
            master,
            stores,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &CareConfig {
        &self.config
    }

    /// The master store: office mapping, staff directory and audit log.
    #[must_use]
    pub fn master(&self) -> &CareDb {
        &self.master
    }

    pub(crate) const fn stores(&self) -> &StoreProvider {
        &self.stores
    }

    pub(crate) fn session_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(self.config.session.session_minutes)
    }
}
