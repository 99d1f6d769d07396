//! API configuration
//!
//! Read from `API_`-prefixed environment variables. Nested sections use a
//! double underscore, e.g. `API_EXPENSE__MAX_INSTALLMENTS=12`.

use serde::Deserialize;

use core_kernel::Timezone;
use domain_expense::ExpenseConfig;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret the identity provider signs tokens with
    pub jwt_secret: String,
    /// Required `aud` claim; not checked when unset
    #[serde(default)]
    pub jwt_audience: Option<String>,
    /// Lifetime of tokens issued by [`crate::auth::create_token`]
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
    /// Database URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Upper bound of the connection pool
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    /// Log level, or any `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Timezone whose calendar decides "this month"
    #[serde(default)]
    pub timezone: Timezone,
    #[serde(default)]
    pub expense: ExpenseConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_jwt_expiration() -> u64 {
    3600
}

fn default_database_url() -> String {
    "postgres://localhost/finance".to_string()
}

fn default_database_max_connections() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl ApiConfig {
    /// Configuration with defaults for everything but the JWT secret
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: jwt_secret.into(),
            jwt_audience: None,
            jwt_expiration_secs: default_jwt_expiration(),
            database_url: default_database_url(),
            database_max_connections: default_database_max_connections(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            timezone: Timezone::default(),
            expense: ExpenseConfig::default(),
        }
    }

    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("API"))
    }

    fn from_source(env: config::Environment) -> Result<Self, config::ConfigError> {
        let config: ApiConfig = config::Config::builder()
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message("jwt_secret must not be empty".to_string()));
        }
        self.expense
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}
