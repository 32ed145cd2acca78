use serde::Deserialize;
use std::net::SocketAddr;

/// Secret shipped in `config/default.toml` for local development.
pub const DEV_SECRET_KEY: &str = "dev-secret-key-change-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
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

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub name: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Pool settings in the form the persistence layer takes.
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
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

/// Session and notice cookies.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC key for signing session tokens.
    pub secret_key: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_flash_cookie_name")]
    pub flash_cookie_name: String,

    /// Session lifetime in seconds (default: 8 hours).
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: i64,

    /// Add the `Secure` attribute; enable behind HTTPS.
    #[serde(default)]
    pub secure: bool,
}

/// Demo accounts created at startup when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_student_username")]
    pub student_username: String,

    #[serde(default = "default_student_password")]
    pub student_password: String,

    /// `student.student_id` the demo student account is linked to.
    #[serde(default = "default_student_id")]
    pub student_id: i32,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            student_username: default_student_username(),
            student_password: default_student_password(),
            student_id: default_student_id(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_request_timeout() -> u64 {
    30
}
fn default_db_host() -> String {
    "localhost".to_string()
}
fn default_db_port() -> u16 {
    5432
}
fn default_db_user() -> String {
    "course_tracker".to_string()
}
fn default_db_name() -> String {
    "course_tracker".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    5
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_cookie_name() -> String {
    "ct_session".to_string()
}
fn default_flash_cookie_name() -> String {
    "ct_flash".to_string()
}
fn default_session_ttl() -> i64 {
    28_800
}
fn default_student_username() -> String {
    "teststudent".to_string()
}
fn default_student_password() -> String {
    "student123".to_string()
}
fn default_student_id() -> i32 {
    4001
}
fn default_admin_username() -> String {
    "testadmin".to_string()
}
fn default_admin_password() -> String {
    "admin123".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Unprefixed variables accepted for compatibility with existing deployments.
const LEGACY_ENV: [(&str, &str); 6] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("SECRET_KEY", "session.secret_key"),
];

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CT__ prefix
    /// 4. DB_HOST, DB_PORT, DB_USER, DB_PASSWORD, DB_NAME, SECRET_KEY
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CT").separator("__"));

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 5000
            request_timeout_secs = 30

            [database]
            host = "localhost"
            port = 5432
            user = "course_tracker"
            password = ""
            name = "course_tracker"
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 5
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [session]
            secret_key = "dev-secret-key-change-in-production"
            cookie_name = "ct_session"
            flash_cookie_name = "ct_flash"
            ttl_secs = 28800
            secure = false

            [bootstrap]
            enabled = false
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.name.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "database.name (CT__DATABASE__NAME or DB_NAME) must be set".to_string(),
            ));
        }

        if self.session.secret_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "session.secret_key (CT__SESSION__SECRET_KEY or SECRET_KEY) must be set"
                    .to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.session.ttl_secs <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "session.ttl_secs must be positive".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// Whether the development secret from the default file is still in use.
    pub fn uses_dev_secret(&self) -> bool {
        self.session.secret_key == DEV_SECRET_KEY
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigValidationError::InvalidValue(format!(
                    "server.host '{}' is not an IP address",
                    self.server.host
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.name, "course_tracker");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.session.cookie_name, "ct_session");
        assert!(!config.bootstrap.enabled);
        assert_eq!(config.bootstrap.student_id, 4001);
        assert!(config.validate().is_ok());
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_config_env_override() {
        let config = Config::load_for_test(&[
            ("server.port", "9000"),
            ("logging.level", "debug"),
            ("database.password", "s3cret"),
            ("session.secret_key", "a-real-secret"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.password, "s3cret");
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let config =
            Config::load_for_test(&[("session.secret_key", "")]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn test_config_validation_missing_db_name() {
        let config =
            Config::load_for_test(&[("database.name", " ")]).expect("Failed to load config");
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("DB_NAME"));
    }

    #[test]
    fn test_config_validation_invalid_pool_settings() {
        let config = Config::load_for_test(&[
            ("database.min_connections", "100"),
            ("database.max_connections", "10"),
        ])
        .expect("Failed to load config");

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("min_connections"));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[("server.host", "127.0.0.1"), ("server.port", "3000")])
            .expect("Failed to load config");

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_socket_addr_rejects_hostname() {
        let config = Config::load_for_test(&[("server.host", "localhost")])
            .expect("Failed to load config");
        assert!(config.socket_addr().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pool_config_carries_fields() {
        let config = Config::load_for_test(&[("database.port", "6543")])
            .expect("Failed to load config");
        let pool = config.database.pool_config();
        assert_eq!(pool.port, 6543);
        assert_eq!(pool.name, "course_tracker");
        assert_eq!(pool.max_connections, 10);
    }
}
