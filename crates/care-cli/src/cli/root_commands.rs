use clap::Subcommand;

use crate::cli::subcommands::{
    AuditCommands, IncidentCommands, MaintenanceCommands, OfficeCommands, RecordCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Office to store mapping.
    Offices {
        #[command(subcommand)]
        action: OfficeCommands,
    },
    /// Support records.
    Records {
        #[command(subcommand)]
        action: RecordCommands,
    },
    /// Incident reports.
    Incidents {
        #[command(subcommand)]
        action: IncidentCommands,
    },
    /// Audit log.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Archive and retention jobs.
    Maintenance {
        #[command(subcommand)]
        action: MaintenanceCommands,
    },
}
