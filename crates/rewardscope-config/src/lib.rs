//! Configuration management for rewardscope
//!
//! Centralized configuration handling with support for:
//! - Default values
//! - Configuration files (TOML)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables (`REWARDSCOPE_<SECTION>__<FIELD>`)
//! 3. Configuration file (`rewardscope.toml`, or an explicit path)
//! 4. Default values
//!
//! Store credentials have no defaults and are expected from the environment,
//! e.g. `REWARDSCOPE_STORE__AUTH_KEY`.

mod app;
mod archive;
mod prices;
mod store;

// Re-export main types
pub use app::{AppConfig, LogLevel};
pub use archive::ArchiveConfig;
pub use prices::PriceConfig;
pub use store::StoreConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure containing all configuration categories
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application-wide settings
    pub app: AppConfig,

    /// Remote CSV endpoint and local archive
    pub archive: ArchiveConfig,

    /// Market price endpoints
    pub prices: PriceConfig,

    /// Remote key-value store
    pub store: StoreConfig,

    /// Series assembly options
    pub series: SeriesConfig,
}

/// Series assembly options
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SeriesConfig {
    /// Sort hourly records by timestamp before publishing.
    /// Off by default: records keep archive listing order.
    pub sort_chronologically: bool,
}

impl Settings {
    /// Load configuration from multiple sources with proper precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&Settings::default())?)
            // Add configuration file if it exists
            .add_source(
                config::File::with_name("rewardscope")
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(Self::environment());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load configuration from a specific file path, still honouring the
    /// environment
    pub fn load_from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(Self::environment());

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// [`Settings::load_from_file`] when a path is given, [`Settings::load`] otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    /// Merge command-line arguments into the loaded configuration
    pub fn merge_cli_args(mut self, cli_args: &dyn CliConfigMerge) -> Self {
        cli_args.merge_into_config(&mut self);
        self
    }

    // Double underscore separates section from field so that field names
    // may contain single underscores.
    fn environment() -> config::Environment {
        config::Environment::with_prefix("REWARDSCOPE")
            .prefix_separator("_")
            .separator("__")
    }
}

/// Trait for merging CLI arguments into configuration
pub trait CliConfigMerge {
    fn merge_into_config(&self, config: &mut Settings);
}
