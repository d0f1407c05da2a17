/// Compute effective limit with precedence: command arg -> configured default.
#[must_use]
pub fn effective_limit(local: Option<usize>, configured: usize) -> usize {
    local.unwrap_or(configured)
}

#[cfg(test)]
mod tests {
    use super::effective_limit;
    use pretty_assertions::assert_eq;

    #[test]
    fn local_takes_precedence() {
        assert_eq!(effective_limit(Some(5), 50), 5);
        assert_eq!(effective_limit(Some(0), 50), 0);
    }

    #[test]
    fn configured_used_when_local_missing() {
        assert_eq!(effective_limit(None, 50), 50);
    }
}
