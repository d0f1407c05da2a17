//! Tenant directory.
//!
//! The `office_mapping` partition of the master store maps each office to a
//! records store id and an optional incidents store id. Store ids are opened
//! through [`StoreProvider`], which caches one handle per id.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use care_config::StorageConfig;
use care_core::partitions::OFFICE_MAPPING;

use crate::CareDb;
use crate::error::{DatabaseError, StoreError};
use crate::helpers::{cell, opt_cell};
use crate::retry::RetryConfig;
use crate::service::CareService;
use crate::storage::{Row, Table};

/// One row of the office mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeMapping {
    pub office: String,
    pub records_store: String,
    pub incidents_store: Option<String>,
}

impl OfficeMapping {
    fn from_row(row: &Row) -> Option<Self> {
        let office = cell(row, 0).trim();
        if office.is_empty() {
            return None;
        }
        Some(Self {
            office: office.to_string(),
            records_store: cell(row, 1).trim().to_string(),
            incidents_store: opt_cell(row, 2),
        })
    }

    fn to_row(&self) -> Row {
        vec![
            self.office.clone(),
            self.records_store.clone(),
            self.incidents_store.clone().unwrap_or_default(),
        ]
    }
}

/// Stores resolved for one office.
pub struct Tenant {
    pub office: String,
    records: Arc<CareDb>,
    incidents: Option<Arc<CareDb>>,
}

impl Tenant {
    #[must_use]
    pub fn records(&self) -> &CareDb {
        &self.records
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotConfigured` when the office has no incidents store.
    pub fn incidents(&self) -> Result<&CareDb, StoreError> {
        self.incidents
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured {
                office: self.office.clone(),
                store: "incidents".to_string(),
            })
    }

    #[must_use]
    pub const fn has_incidents(&self) -> bool {
        self.incidents.is_some()
    }
}

/// Opens stores by id and keeps them open.
///
/// File-backed stores live at `<data_dir>/<id>.db`. Without a data dir every
/// id gets its own in-memory database, kept for the provider's lifetime.
pub struct StoreProvider {
    storage: StorageConfig,
    open: Mutex<HashMap<String, Arc<CareDb>>>,
}

impl StoreProvider {
    #[must_use]
    pub fn new(storage: StorageConfig) -> Self {
        Self {
            storage,
            open: Mutex::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for ids with characters other than
    /// ASCII alphanumerics, `-` and `_`, or any error from opening the store.
    pub async fn open(&self, store_id: &str) -> Result<Arc<CareDb>, DatabaseError> {
        validate_store_id(store_id)?;
        let mut open = self.open.lock().await;
        if let Some(db) = open.get(store_id) {
            return Ok(Arc::clone(db));
        }

        let path = match self.storage.store_path(store_id) {
            Some(file) => {
                if let Some(dir) = file.parent() {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        DatabaseError::InvalidState(format!("cannot create {}: {e}", dir.display()))
                    })?;
                }
                file.to_string_lossy().into_owned()
            }
            None => ":memory:".to_string(),
        };
        let retry = RetryConfig::default().with_max_attempts(self.storage.read_retry_attempts);
        let db = CareDb::open_local(&path)
            .await?
            .with_limits(Duration::from_millis(self.storage.timeout_ms), retry);
        tracing::debug!(store_id, path = %path, "opened store");

        let db = Arc::new(db);
        open.insert(store_id.to_string(), Arc::clone(&db));
        Ok(db)
    }
}

fn validate_store_id(store_id: &str) -> Result<(), DatabaseError> {
    let valid = !store_id.is_empty()
        && store_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidState(format!(
            "invalid store id '{store_id}'"
        )))
    }
}

impl CareService {
    /// Every office in the mapping, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the master store cannot be read.
    pub async fn list_offices(&self) -> Result<Vec<OfficeMapping>, StoreError> {
        let rows = self.master().table(OFFICE_MAPPING).read_all().await?;
        Ok(rows.iter().filter_map(OfficeMapping::from_row).collect())
    }

    /// Resolve an office by exact trimmed name and open its stores.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown office and `NotConfigured` when the
    /// mapping has no records store.
    pub async fn resolve_tenant(&self, office: &str) -> Result<Tenant, StoreError> {
        let office = office.trim();
        let mapping = self
            .list_offices()
            .await?
            .into_iter()
            .find(|m| m.office == office)
            .ok_or_else(|| StoreError::not_found("office", office))?;

        if mapping.records_store.is_empty() {
            return Err(StoreError::NotConfigured {
                office: mapping.office,
                store: "records".to_string(),
            });
        }
        let records = self.stores().open(&mapping.records_store).await?;
        let incidents = match mapping.incidents_store.as_deref() {
            Some(id) => Some(self.stores().open(id).await?),
            None => None,
        };
        Ok(Tenant {
            office: mapping.office,
            records,
            incidents,
        })
    }

    /// Add an office to the mapping.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name, a blank or malformed store id,
    /// or an office that is already registered.
    pub async fn register_office(
        &self,
        office: &str,
        records_store: &str,
        incidents_store: Option<&str>,
    ) -> Result<OfficeMapping, StoreError> {
        let office = office.trim();
        if office.is_empty() {
            return Err(StoreError::validation("office name must not be blank"));
        }
        let incidents_store = incidents_store.map(str::trim).filter(|s| !s.is_empty());
        for id in std::iter::once(records_store.trim()).chain(incidents_store) {
            validate_store_id(id).map_err(|e| StoreError::validation(e.to_string()))?;
        }
        if self.list_offices().await?.iter().any(|m| m.office == office) {
            return Err(StoreError::validation(format!(
                "office '{office}' is already registered"
            )));
        }

        let mapping = OfficeMapping {
            office: office.to_string(),
            records_store: records_store.trim().to_string(),
            incidents_store: incidents_store.map(String::from),
        };
        self.master()
            .table(OFFICE_MAPPING)
            .append_rows(&[mapping.to_row()])
            .await?;
        tracing::info!(office, "registered office");
        Ok(mapping)
    }
}
