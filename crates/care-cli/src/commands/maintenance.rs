use anyhow::bail;
use chrono::Utc;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MaintenanceCommands;
use crate::commands::shared::errors::user_facing;
use crate::context::AppContext;
use crate::output::output;

/// Handle `care maintenance`.
pub async fn handle(
    action: &MaintenanceCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MaintenanceCommands::Run => {
            let report = ctx
                .service
                .run_daily_maintenance(Utc::now())
                .await
                .map_err(user_facing)?;
            output(&report, flags.format)?;
            let failures = report.failures();
            if failures > 0 {
                bail!("{failures} maintenance job(s) failed");
            }
            Ok(())
        }
        MaintenanceCommands::Sweep { office } => {
            let outcome = ctx.service.archive_sweep(office).await.map_err(user_facing)?;
            output(&outcome, flags.format)
        }
    }
}
