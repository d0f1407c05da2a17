use crate::cli::GlobalFlags;
use crate::cli::subcommands::OfficeCommands;
use crate::commands::shared::errors::user_facing;
use crate::context::AppContext;
use crate::output::output;

/// Handle `care offices`.
pub async fn handle(
    action: &OfficeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OfficeCommands::List => {
            let offices = ctx.service.list_offices().await.map_err(user_facing)?;
            output(&offices, flags.format)
        }
        OfficeCommands::Register {
            office,
            records_store,
            incidents_store,
        } => {
            let mapping = ctx
                .service
                .register_office(office, records_store, incidents_store.as_deref())
                .await
                .map_err(user_facing)?;
            output(&mapping, flags.format)
        }
    }
}
