use care_db::repos::HistoryFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{HistoryArgs, HistoryFilterArgs, IncidentCommands};
use crate::commands::shared::errors::user_facing;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `care incidents`.
pub async fn handle(
    action: &IncidentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        IncidentCommands::Pending {
            office,
            staff,
            pin,
            limit,
            offset,
        } => {
            let session = ctx
                .service
                .sign_in(office, staff, pin)
                .await
                .map_err(user_facing)?;
            let limit = effective_limit(*limit, ctx.service.config().pagination.default_limit);
            let page = ctx
                .service
                .list_pending(office, &session, limit, *offset)
                .await
                .map_err(user_facing)?;
            output(&page, flags.format)
        }
        IncidentCommands::History(args) => history(args, ctx, flags).await,
        IncidentCommands::HistoryCsv { office, filter } => {
            let csv = ctx
                .service
                .history_csv(office, &to_filter(filter))
                .await
                .map_err(user_facing)?;
            print!("{csv}");
            Ok(())
        }
    }
}

async fn history(args: &HistoryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, ctx.service.config().pagination.default_limit);
    let page = ctx
        .service
        .list_history(
            &args.office,
            &to_filter(&args.filter),
            limit,
            args.continuation.as_ref(),
        )
        .await
        .map_err(user_facing)?;
    output(&page, flags.format)
}

fn to_filter(args: &HistoryFilterArgs) -> HistoryFilter {
    HistoryFilter {
        user: args.user.clone(),
        recorder: args.recorder.clone(),
        incident_type: args.incident_type.clone(),
        from: args.from,
        to: args.to,
    }
}
