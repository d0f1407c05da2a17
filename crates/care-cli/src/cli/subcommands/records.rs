use care_core::pagination::ContinuationToken;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// Support record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RecordCommands {
    /// Page through records, live first, then archives newest year first.
    List(RecordListArgs),
}

/// Arguments for `care records list`.
#[derive(Clone, Debug, Args)]
pub struct RecordListArgs {
    #[arg(long)]
    pub office: String,
    /// Only records for this user.
    #[arg(long)]
    pub user: Option<String>,
    /// Inclusive lower bound on the occurrence time (RFC 3339).
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the occurrence time (RFC 3339).
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,
    #[arg(long)]
    pub limit: Option<usize>,
    /// Token returned by the previous page.
    #[arg(long)]
    pub continuation: Option<ContinuationToken>,
}
