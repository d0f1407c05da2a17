use chrono::{DateTime, Utc};
use clap::Subcommand;

/// Audit log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// List events, newest first.
    List {
        #[arg(long)]
        office: Option<String>,
        /// Action name, e.g. ARCHIVE_MOVE or archive-move.
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        executor: Option<String>,
        /// Only events at or after this time (RFC 3339).
        #[arg(long)]
        since: Option<DateTime<Utc>>,
        #[arg(long)]
        limit: Option<usize>,
    },
}
