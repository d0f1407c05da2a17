use care_config::CareConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CareConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CareConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.storage.is_persistent() {
        if has_env_prefix(&env_keys, "CARE_STORAGE_") && !has_env_prefix(&env_keys, "CARE_STORAGE__")
        {
            warnings.push(
                "Storage config appears default while CARE_STORAGE_* env vars exist. Use double underscores (example: CARE_STORAGE__DATA_DIR)."
                    .to_string(),
            );
        }
        warnings.push(
            "storage.data_dir is empty: stores are in memory and nothing will persist.".to_string(),
        );
    }

    if has_env_prefix(&env_keys, "CARE_RETENTION_") && !has_env_prefix(&env_keys, "CARE_RETENTION__")
    {
        warnings.push(
            "CARE_RETENTION_* env vars are ignored. Use double underscores (example: CARE_RETENTION__ARCHIVE_AFTER_DAYS)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use care_config::CareConfig;

    use super::collect_unconfigured_warnings;
    use pretty_assertions::assert_eq;

    fn persistent() -> CareConfig {
        let mut config = CareConfig::default();
        config.storage.data_dir = "/var/lib/care".to_string();
        config
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &CareConfig::default(),
            vec![
                ("CARE_STORAGE_DATA_DIR".to_string(), "/tmp/care".to_string()),
                ("CARE_RETENTION_TRASH_RETENTION_DAYS".to_string(), "7".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn in_memory_mode_is_always_flagged() {
        let warnings = collect_unconfigured_warnings(&CareConfig::default(), Vec::new());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("in memory"));
    }

    #[test]
    fn does_not_warn_when_configured() {
        let warnings = collect_unconfigured_warnings(
            &persistent(),
            vec![(
                "CARE_RETENTION__TRASH_RETENTION_DAYS".to_string(),
                "7".to_string(),
            )],
        );

        assert!(warnings.is_empty());
    }
}
