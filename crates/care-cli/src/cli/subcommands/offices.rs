use clap::Subcommand;

/// Office mapping commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OfficeCommands {
    /// List configured offices and their stores.
    List,
    /// Map a new office to its stores.
    Register {
        #[arg(long)]
        office: String,
        /// Store id holding the office's support records.
        #[arg(long)]
        records_store: String,
        /// Store id holding incident reports; omit for records-only offices.
        #[arg(long)]
        incidents_store: Option<String>,
    },
}
