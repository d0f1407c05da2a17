//! Entity structs for all care domain objects.
//!
//! Each entity maps to one fixed-width row of a partition. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod audit;
mod incident;
mod record;
mod trash;

pub use audit::{AuditContext, AuditEvent, AUDIT_SCHEMA_VERSION};
pub use incident::{IncidentDraft, IncidentEntry, IncidentReport};
pub use record::{RecordDraft, RecordEntry, RecordRef, SupportRecord, Vitals, search_index};
pub use trash::TrashEntry;
