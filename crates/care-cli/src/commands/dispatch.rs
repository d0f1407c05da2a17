use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Offices { action } => commands::offices::handle(&action, ctx, flags).await,
        Commands::Records { action } => commands::records::handle(&action, ctx, flags).await,
        Commands::Incidents { action } => commands::incidents::handle(&action, ctx, flags).await,
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
        Commands::Maintenance { action } => {
            commands::maintenance::handle(&action, ctx, flags).await
        }
    }
}
