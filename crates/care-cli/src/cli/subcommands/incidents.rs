use care_core::pagination::ContinuationToken;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Incident report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum IncidentCommands {
    /// Reports awaiting action by the signed-in staff member.
    Pending {
        #[arg(long)]
        office: String,
        /// Staff name to sign in as.
        #[arg(long)]
        staff: String,
        #[arg(long)]
        pin: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Approved reports, newest first.
    History(HistoryArgs),
    /// Approved reports as CSV, newest first.
    HistoryCsv {
        #[arg(long)]
        office: String,
        #[command(flatten)]
        filter: HistoryFilterArgs,
    },
}

/// Arguments for `care incidents history`.
#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub office: String,
    #[command(flatten)]
    pub filter: HistoryFilterArgs,
    #[arg(long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub continuation: Option<ContinuationToken>,
}

/// History filters shared by the paged and CSV views.
#[derive(Clone, Debug, Args)]
pub struct HistoryFilterArgs {
    /// Subject user.
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub recorder: Option<String>,
    /// Exact incident type.
    #[arg(long = "type")]
    pub incident_type: Option<String>,
    /// First day included (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,
}
