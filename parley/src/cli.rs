//! Command-line arguments for the `parley` binary.
//!
//! Priority resolution: CLI flags > environment > config file > defaults.
//! clap reads the environment fallbacks, so a flag always wins over its
//! variable.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{ConfigError, ParleyConfig};

pub const DEFAULT_CONFIG_PATH: &str = "parley.toml";

/// Conversational gateway with language directives and credential failover.
#[derive(Parser, Debug, Default)]
#[command(name = "parley", version, about)]
pub struct CliArgs {
    /// Path to the TOML configuration file.
    #[arg(short = 'c', long = "config", env = "PARLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Socket address to listen on, e.g. 0.0.0.0:5000.
    #[arg(short = 'b', long = "bind", env = "PARLEY_BIND")]
    pub bind: Option<String>,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Model identifier sent to the provider.
    #[arg(long = "model")]
    pub model: Option<String>,

    /// Maximum dispatch attempts per question.
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<u32>,
}

impl CliArgs {
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// File config with flags applied, validated.
    ///
    /// A named file must exist. At the default location only a missing file
    /// falls back to defaults.
    pub fn load_config(&self) -> Result<ParleyConfig, ConfigError> {
        self.load_config_from(&self.resolve_config_path())
    }

    fn load_config_from(&self, path: &Path) -> Result<ParleyConfig, ConfigError> {
        let file_config = if self.config.is_some() {
            ParleyConfig::load(path)?
        } else {
            ParleyConfig::load_or_default(path)?
        };
        let config = self.apply(file_config);
        config.validate()?;
        Ok(config)
    }

    /// Overlays any flags that were given onto `config`.
    pub fn apply(&self, mut config: ParleyConfig) -> ParleyConfig {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.chat.max_attempts = Some(max_attempts);
        }
        config
    }
}
