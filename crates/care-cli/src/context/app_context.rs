use care_config::CareConfig;
use care_db::service::CareService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CareService,
}

impl AppContext {
    /// Open the master store; office stores open lazily on first use.
    pub async fn init(config: CareConfig) -> anyhow::Result<Self> {
        let service = CareService::open(config).await?;
        Ok(Self { service })
    }
}

/// Load layered configuration (with `.env`) and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<CareConfig> {
    let mut config = CareConfig::load_with_dotenv()?;
    if let Some(data_dir) = &flags.data_dir {
        config.storage.data_dir.clone_from(data_dir);
    }
    Ok(config)
}
