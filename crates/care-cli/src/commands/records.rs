use care_db::repos::RecordQuery;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{RecordCommands, RecordListArgs};
use crate::commands::shared::errors::user_facing;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `care records`.
pub async fn handle(
    action: &RecordCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RecordCommands::List(args) => list(args, ctx, flags).await,
    }
}

async fn list(args: &RecordListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let query = RecordQuery {
        user: args.user.clone(),
        start: args.start,
        end: args.end,
        limit: effective_limit(args.limit, ctx.service.config().pagination.default_limit),
        continuation: args.continuation.clone(),
    };
    let page = ctx
        .service
        .get_records(&args.office, &query)
        .await
        .map_err(user_facing)?;
    output(&page, flags.format)
}
