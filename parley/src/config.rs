//! TOML configuration for the parley service.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! runnable configuration. Values are layered as CLI flags, then environment,
//! then file, then defaults; see [`crate::cli`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use pchat::{DirectivePolicy, PERSONA_MODEL_SEED, PERSONA_USER_SEED};
use pprovider::{RotationPolicy, Turn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_CREDENTIAL_PREFIX: &str = "GENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Credentials are read from `<prefix>_1`, `<prefix>_2`, ...
    pub credential_env_prefix: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: pprovider::adapters::gemini::GEMINI_BASE_URL.to_string(),
            model: pprovider::adapters::gemini::DEFAULT_GEMINI_MODEL.to_string(),
            request_timeout_secs: 60,
            credential_env_prefix: DEFAULT_CREDENTIAL_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTurn {
    pub role: SeedRole,
    pub content: String,
}

impl SeedTurn {
    fn to_turn(&self) -> Turn {
        match self.role {
            SeedRole::User => Turn::user(self.content.clone()),
            SeedRole::Model => Turn::model(self.content.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub retry_delay_ms: u64,
    /// Dispatch attempts per question. Unset means one per credential, at least two.
    pub max_attempts: Option<u32>,
    pub directive_policy: String,
    pub persona: Vec<SeedTurn>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: 2_000,
            max_attempts: None,
            directive_policy: DirectivePolicy::default().as_str().to_string(),
            persona: vec![
                SeedTurn {
                    role: SeedRole::User,
                    content: PERSONA_USER_SEED.to_string(),
                },
                SeedTurn {
                    role: SeedRole::Model,
                    content: PERSONA_MODEL_SEED.to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ParleyConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ParleyConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Defaults when the file does not exist. A file that exists but does not
    /// parse or validate is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.credential_env_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.credential_env_prefix must not be empty".to_string(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "provider.model must not be empty".to_string(),
            ));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.chat.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "chat.max_attempts must be at least 1".to_string(),
            ));
        }
        self.directive_policy()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.request_timeout_secs)
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        let policy = match self.chat.max_attempts {
            Some(max_attempts) => RotationPolicy::new(max_attempts),
            None => RotationPolicy::default(),
        };
        policy.with_retry_delay(Duration::from_millis(self.chat.retry_delay_ms))
    }

    pub fn directive_policy(&self) -> Result<DirectivePolicy, ConfigError> {
        self.chat
            .directive_policy
            .parse()
            .map_err(ConfigError::Invalid)
    }

    pub fn persona_turns(&self) -> Vec<Turn> {
        self.chat.persona.iter().map(SeedTurn::to_turn).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pchat::{DirectivePolicy, PERSONA_USER_SEED};
    use pprovider::Turn;

    use super::{ConfigError, ParleyConfig};

    #[test]
    fn empty_document_yields_defaults() {
        let config: ParleyConfig = toml::from_str("").expect("empty config should parse");

        assert_eq!(config, ParleyConfig::default());
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.provider.model, "gemini-1.5-flash");
        assert_eq!(config.provider.credential_env_prefix, "GENAI_API_KEY");
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.rotation_policy().retry_delay, Duration::from_secs(2));
        assert_eq!(config.rotation_policy().max_attempts, None);
        assert_eq!(
            config.directive_policy().expect("default policy should parse"),
            DirectivePolicy::OncePerLanguageChange
        );
        assert_eq!(config.persona_turns()[0], Turn::user(PERSONA_USER_SEED));
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let config: ParleyConfig = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:8080"

            [chat]
            max_attempts = 4
            retry_delay_ms = 250
            directive_policy = "accumulate"

            [[chat.persona]]
            role = "user"
            content = "You answer questions about leases."
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert!(config.server.cors_origins.is_empty());
        assert_eq!(config.rotation_policy().max_attempts, Some(4));
        assert_eq!(
            config.rotation_policy().retry_delay,
            Duration::from_millis(250)
        );
        assert_eq!(
            config.directive_policy().expect("policy should parse"),
            DirectivePolicy::Accumulate
        );
        assert_eq!(
            config.persona_turns(),
            vec![Turn::user("You answer questions about leases.")]
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let mut config = ParleyConfig::default();
        config.chat.directive_policy = "sometimes".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ParleyConfig::default();
        config.chat.max_attempts = Some(0);
        assert!(config.validate().is_err());

        let mut config = ParleyConfig::default();
        config.provider.credential_env_prefix = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = std::env::temp_dir().join(format!("parley-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");

        let missing = dir.join("missing.toml");
        assert!(matches!(
            ParleyConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
        assert_eq!(
            ParleyConfig::load_or_default(&missing).expect("missing file should default"),
            ParleyConfig::default()
        );

        let malformed = dir.join("malformed.toml");
        std::fs::write(&malformed, "[server\nbind = ").expect("file should be writable");
        assert!(matches!(
            ParleyConfig::load(&malformed),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            ParleyConfig::load_or_default(&malformed),
            Err(ConfigError::Parse { .. })
        ));

        let invalid = dir.join("invalid.toml");
        std::fs::write(&invalid, "[chat]\nmax_attempts = 0\n").expect("file should be writable");
        assert!(matches!(
            ParleyConfig::load_or_default(&invalid),
            Err(ConfigError::Invalid(_))
        ));

        let valid = dir.join("valid.toml");
        std::fs::write(&valid, "[logging]\nlevel = \"debug\"\n").expect("file should be writable");
        assert_eq!(
            ParleyConfig::load(&valid)
                .expect("valid file should load")
                .logging
                .level,
            "debug"
        );

        std::fs::remove_dir_all(&dir).expect("temp dir should be removable");
    }
}
