use std::env;
use std::time::Duration;

use auth::TokenService;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    /// Signing secret shared by token issuance and verification
    pub secret: String,
    /// Lifetime of tokens issued at login
    pub ttl_seconds: i64,
}

impl JwtConfig {
    /// Longest token lifetime accepted from configuration (one year).
    pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// `memory` or a `postgres://` connection URL
    pub endpoint: String,
    #[serde(default = "StoreConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "StoreConfig::default_max_connections")]
    pub max_connections: u32,
}

/// Backing store selected by `store.endpoint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres(String),
}

impl StoreConfig {
    fn default_timeout_ms() -> u64 {
        3000
    }

    fn default_max_connections() -> u32 {
        5
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolve the endpoint into a backend.
    ///
    /// # Errors
    /// * `Message` - Endpoint scheme is not recognized
    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint == "memory" {
            Ok(StoreBackend::Memory)
        } else if endpoint.starts_with("postgres://") || endpoint.starts_with("postgresql://") {
            Ok(StoreBackend::Postgres(endpoint.to_string()))
        } else {
            Err(ConfigError::Message(format!(
                "unsupported store endpoint '{}': expected 'memory' or a postgres:// URL",
                endpoint
            )))
        }
    }
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, STORE__ENDPOINT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: STORE__ENDPOINT=postgres://... overrides store.endpoint
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < TokenService::MIN_SECRET_LEN {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                TokenService::MIN_SECRET_LEN
            )));
        }

        if self.jwt.ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "jwt.ttl_seconds must be positive".to_string(),
            ));
        }

        if self.jwt.ttl_seconds > JwtConfig::MAX_TTL_SECONDS {
            return Err(ConfigError::Message(format!(
                "jwt.ttl_seconds must be at most {}",
                JwtConfig::MAX_TTL_SECONDS
            )));
        }

        if self.store.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "store.timeout_ms must be positive".to_string(),
            ));
        }

        self.store.backend().map(|_| ())
    }
}
