use clap::Subcommand;

/// Retention job commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MaintenanceCommands {
    /// Run every retention job for every office, then purge the audit log.
    Run,
    /// Move aged records of one office into its archives.
    Sweep {
        #[arg(long)]
        office: String,
    },
}
