use super::{Config, ConfigOverrides};
use crate::constants;
use crate::errors::ConfigError;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    /// Loads `<config_dir>/main.toml`, applies command line overrides and
    /// validates the result. A missing file means all defaults.
    pub async fn new(config_dir: &str, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::load_configuration(config_dir).await?;
        config.apply_overrides(overrides);
        config.validate()?;

        info!(
            "Configuration ready: filter {}={}, {} workers, inventory {} ({}){}",
            config.tags.eligibility_key,
            config.tags.eligibility_value,
            config.worker_count,
            config.inventory.endpoint,
            config.inventory.region,
            if config.dry_run { ", dry run" } else { "" }
        );

        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config, ConfigError> {
        let main_config_path = Path::new(config_dir).join(constants::config::MAIN_FILE);
        let path_display = main_config_path.display().to_string();

        if !fs::try_exists(&main_config_path).await.unwrap_or(false) {
            debug!("No config file at {}, using defaults", path_display);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: path_display.clone(),
                reason: e.to_string(),
            })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path_display.clone(),
            reason: e.to_string(),
        })?;

        debug!("Loaded config file {}", path_display);
        Ok(config)
    }
}
