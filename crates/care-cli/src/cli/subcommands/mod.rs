mod audit;
mod incidents;
mod maintenance;
mod offices;
mod records;

pub use audit::AuditCommands;
pub use incidents::{HistoryArgs, HistoryFilterArgs, IncidentCommands};
pub use maintenance::MaintenanceCommands;
pub use offices::OfficeCommands;
pub use records::{RecordCommands, RecordListArgs};
