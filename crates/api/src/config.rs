use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub auth: AuthConfig,
    /// Operator session tokens
    pub session: SessionConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend: `memory` (embedded) or `rest` (hosted).
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Base URL of the hosted store (rest backend only).
    #[serde(default)]
    pub base_url: String,

    /// Poll interval for emulated subscriptions (rest backend only).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            base_url: String::new(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Identity provider: `bootstrap` (config-declared operators) or
    /// `http` (hosted identity service).
    #[serde(default = "default_auth_provider")]
    pub provider: String,

    /// Identity service base URL (http provider only).
    #[serde(default)]
    pub endpoint: String,

    /// Operators recognized by the bootstrap provider.
    #[serde(default)]
    pub operators: Vec<BootstrapOperator>,
}

/// One config-declared operator account.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapOperator {
    pub account_id: String,
    pub email: String,
    /// Argon2id PHC hash of the operator password.
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HS256 secret for session tokens.
    pub secret: String,

    /// Session lifetime in seconds (default: 8 hours).
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: i64,

    /// Lifetime when the operator asks to be remembered (default: 14 days).
    #[serde(default = "default_remember_ttl")]
    pub remember_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Account with fleet-wide visibility. Unset means no owner session.
    #[serde(default)]
    pub owner_account_id: Option<String>,

    /// Bounded tail for the notifications view.
    #[serde(default = "default_notification_tail")]
    pub notification_tail: usize,

    /// Last-opened-page persistence file. Empty disables persistence.
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            owner_account_id: None,
            notification_tail: default_notification_tail(),
            preferences_path: default_preferences_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-client login attempts per minute; 0 disables rate limiting.
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit_per_minute: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            login_rate_limit_per_minute: default_login_rate_limit(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_store_backend() -> String {
    "memory".to_string()
}
fn default_poll_interval() -> u64 {
    3
}
fn default_auth_provider() -> String {
    "bootstrap".to_string()
}
fn default_session_ttl() -> i64 {
    28_800
}
fn default_remember_ttl() -> i64 {
    1_209_600
}
fn default_notification_tail() -> usize {
    100
}
fn default_preferences_path() -> String {
    "data/preferences.json".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_login_rate_limit() -> u32 {
    10
}

impl Config {
    /// Loads configuration from `config/default.toml`, an optional
    /// `config/local.toml`, and `FC__`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("FC").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Cross-field validation beyond what serde enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.session.secret.is_empty() {
            return Err("session.secret must not be empty".into());
        }
        match self.store.backend.as_str() {
            "memory" => {}
            "rest" => {
                if self.store.base_url.is_empty() {
                    return Err("store.base_url is required for the rest backend".into());
                }
            }
            other => return Err(format!("unknown store backend: {}", other)),
        }
        match self.auth.provider.as_str() {
            "bootstrap" => {}
            "http" => {
                if self.auth.endpoint.is_empty() {
                    return Err("auth.endpoint is required for the http provider".into());
                }
            }
            other => return Err(format!("unknown auth provider: {}", other)),
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("invalid server host/port configuration")
    }

    /// True when the given account is the configured fleet owner.
    pub fn is_owner(&self, account_id: &str) -> bool {
        self.console
            .owner_account_id
            .as_deref()
            .is_some_and(|owner| owner == account_id)
    }
}
