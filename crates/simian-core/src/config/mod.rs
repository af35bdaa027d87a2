//! Configuration management for Simian.

pub mod constants;
mod sub_configs;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use sub_configs::{IndexConfig, LoggingConfig, StorageConfig};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SimianConfig {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimianConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{SIMIAN_ENV}.toml (environment-specific)
    /// 3. Environment variables with SIMIAN_ prefix, e.g. `SIMIAN__INDEX__MAX_DEPTH=4`
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var("SIMIAN_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("SIMIAN").separator("__"));

        let config: SimianConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: SimianConfig = toml::from_str(&content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CoreResult<()> {
        self.index.validate()?;

        match self.storage.backend.as_str() {
            "rocksdb" | "memory" => {}
            other => {
                return Err(CoreError::ConfigError(format!(
                    "storage.backend must be \"rocksdb\" or \"memory\", got \"{}\"",
                    other
                )))
            }
        }

        if self.storage.backend == "rocksdb" && self.storage.path.is_empty() {
            return Err(CoreError::ConfigError(
                "storage.path must not be empty for the rocksdb backend".into(),
            ));
        }

        Ok(())
    }
}
