use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Policy for classifying a staff member's closing cash balance.
///
/// Two variants exist in the field: the older rule reports a negative
/// closing balance as EXCESS, the newer one folds it into PENDING. The
/// choice is deliberately configurable; see DESIGN.md.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementPolicy {
    WithExcess,
    CollapseExcess,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        SettlementPolicy::WithExcess
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Full database connection URL. When empty, the URL is assembled from
    /// the `db_*` parts below.
    #[serde(default)]
    pub database_url: String,

    /// Individual connection parts, used only when `database_url` is empty.
    #[serde(default)]
    pub db_user: String,
    #[serde(default)]
    pub db_password: String,
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default)]
    pub db_name: String,

    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Cash reconciliation status rule
    #[serde(default)]
    pub settlement_policy: SettlementPolicy,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB connect timeout in seconds
    #[serde(default = "default_db_timeout_secs")]
    pub db_connect_timeout_secs: u64,

    /// DB idle timeout in seconds
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,

    /// DB acquire timeout in seconds
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}
fn default_db_port() -> u16 {
    5432
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

impl AppConfig {
    /// Minimal constructor used by tests and tooling.
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            db_user: String::new(),
            db_password: String::new(),
            db_host: default_db_host(),
            db_port: default_db_port(),
            db_name: String::new(),
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            settlement_policy: SettlementPolicy::default(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
        }
    }

    /// Effective database URL: the explicit one when present, otherwise
    /// assembled from the `db_*` parts with the password percent-encoded.
    pub fn effective_database_url(&self) -> Result<String, ConfigError> {
        if !self.database_url.is_empty() {
            return Ok(self.database_url.clone());
        }
        if self.db_name.is_empty() {
            return Err(ConfigError::Message(
                "either database_url or db_name must be configured".into(),
            ));
        }
        let mut url = url::Url::parse(&format!(
            "postgres://{}:{}/{}",
            self.db_host, self.db_port, self.db_name
        ))
        .map_err(|e| ConfigError::Message(format!("invalid database host/port: {}", e)))?;
        url.set_username(&self.db_user)
            .map_err(|_| ConfigError::Message("invalid database user".into()))?;
        if !self.db_password.is_empty() {
            // Url::set_password percent-encodes special characters for us.
            url.set_password(Some(&self.db_password))
                .map_err(|_| ConfigError::Message("invalid database password".into()))?;
        }
        Ok(url.to_string())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(log_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Loads configuration from `config/default.toml`, an environment-specific
/// overlay, and `APP__*` environment variables, in that order.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder();
    let default_path = Path::new(CONFIG_DIR).join("default.toml");
    if default_path.exists() {
        builder = builder.add_source(File::from(default_path));
    }
    let env_path = Path::new(CONFIG_DIR).join(format!("{}.toml", run_env));
    if env_path.exists() {
        builder = builder.add_source(File::from(env_path));
    }
    builder = builder.add_source(Environment::with_prefix("APP").separator("__"));

    let cfg: AppConfig = builder.build()?.try_deserialize()?;
    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("configuration validation failed: {}", e)))?;

    info!(environment = %cfg.environment, "Configuration loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_parts() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "test".into(),
        );
        assert_eq!(cfg.effective_database_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn assembled_url_percent_encodes_password() {
        let mut cfg = AppConfig::new(String::new(), "127.0.0.1".into(), 8080, "test".into());
        cfg.db_user = "depot".into();
        cfg.db_password = "p@ss w#rd".into();
        cfg.db_name = "depot_ledger".into();
        let url = cfg.effective_database_url().unwrap();
        assert!(url.starts_with("postgres://depot:"));
        assert!(!url.contains("p@ss w#rd"));
        assert!(url.ends_with("/depot_ledger"));
    }

    #[test]
    fn missing_url_and_name_is_an_error() {
        let cfg = AppConfig::new(String::new(), "127.0.0.1".into(), 8080, "test".into());
        assert!(cfg.effective_database_url().is_err());
    }
}
