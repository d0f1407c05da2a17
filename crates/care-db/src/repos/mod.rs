//! Repository modules: one `impl CareService` block per entity group.
//!
//! Each file adds read and mutation methods for its partitions. Mutations
//! check the caller's session first and write one audit event through
//! [`CareService::audited`].

pub mod audit;
pub mod incidents;
pub mod records;
pub mod staff;

pub use audit::{AuditDraft, AuditFilter};
pub use incidents::HistoryFilter;
pub use records::RecordQuery;
