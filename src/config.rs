//! Startup configuration for Shopfloor components.
//!
//! Configuration is assembled once at startup and passed explicitly to the
//! components that need it. Sources are layered with increasing precedence:
//!
//! 1. Compiled defaults
//! 2. An optional `shopfloor.toml` in the working directory
//! 3. `SHOPFLOOR__<SECTION>__<KEY>` environment variables (a `.env` file is
//!    loaded into the environment first when present)

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// File stem of the optional configuration file.
pub const CONFIG_FILE_STEM: &str = "shopfloor";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SHOPFLOOR";

const ENV_SEPARATOR: &str = "__";

/// Longest accepted session lifetime (one year).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// A configuration source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// The `.env` file exists but could not be parsed.
    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    /// No session signing secret was configured.
    #[error("auth.session_secret must be set")]
    MissingSessionSecret,

    /// The session lifetime is outside `1..=MAX_SESSION_TTL_HOURS`.
    #[error("auth.session_ttl_hours must be between 1 and {max}, got {0}", max = MAX_SESSION_TTL_HOURS)]
    InvalidSessionTtl(i64),

    /// The connection pool size is zero.
    #[error("database.max_connections must be at least 1")]
    InvalidPoolSize,
}

/// Top-level Shopfloor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopfloorConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Session token settings.
    pub auth: AuthConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/shopfloor".to_owned(),
            max_connections: 10,
        }
    }
}

/// Session token signing settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign bearer session tokens.
    pub session_secret: String,
    /// Lifetime of issued session tokens in hours.
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_secret: String::new(),
            session_ttl_hours: 24,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret", &"<redacted>")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

impl ShopfloorConfig {
    /// Loads configuration from the `.env` file, `shopfloor.toml`, and
    /// `SHOPFLOOR__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] when a source cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigLoadError> {
        load_env_file()?;
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE_STEM).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    /// Parses configuration from a TOML document layered over defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] when the document cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        Self::build(Config::builder().add_source(File::from_str(raw, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigLoadError> {
        let loaded: Self = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.auth.session_secret.trim().is_empty() {
            return Err(ConfigLoadError::MissingSessionSecret);
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.auth.session_ttl_hours) {
            return Err(ConfigLoadError::InvalidSessionTtl(
                self.auth.session_ttl_hours,
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigLoadError::InvalidPoolSize);
        }
        Ok(())
    }
}

fn load_env_file() -> Result<(), ConfigLoadError> {
    if Path::new(".env").exists() {
        dotenvy::dotenv()?;
        tracing::debug!("loaded environment variables from .env");
    }
    Ok(())
}
