use care_db::error::StoreError;

/// Convert a store failure into the message shown to the operator.
///
/// Internal failures keep their details in the debug log only.
pub fn user_facing(error: StoreError) -> anyhow::Error {
    tracing::debug!(kind = %error.kind(), error = %error, "operation failed");
    anyhow::anyhow!("{} [{}]", error.user_message(), error.kind())
}
