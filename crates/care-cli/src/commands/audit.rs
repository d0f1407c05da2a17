use care_db::repos::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::commands::shared::errors::user_facing;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_action;
use crate::context::AppContext;
use crate::output::output;

/// Handle `care audit`.
pub async fn handle(
    action: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuditCommands::List {
            office,
            action,
            executor,
            since,
            limit,
        } => {
            let filter = AuditFilter {
                office: office.clone(),
                action: action.as_deref().map(parse_action).transpose()?,
                executor: executor.clone(),
                since: *since,
                limit: Some(effective_limit(
                    *limit,
                    ctx.service.config().pagination.default_limit,
                )),
            };
            let events = ctx.service.query_audit(&filter).await.map_err(user_facing)?;
            output(&events, flags.format)
        }
    }
}
