use care_core::enums::AuditAction;

/// Parse an audit action name, accepting `ARCHIVE_MOVE`, `archive_move` or `archive-move`.
pub fn parse_action(raw: &str) -> anyhow::Result<AuditAction> {
    let normalized = raw.trim().replace('-', "_").to_uppercase();
    AuditAction::from_cell(&normalized)
        .ok_or_else(|| anyhow::anyhow!("invalid action '{raw}'"))
}
