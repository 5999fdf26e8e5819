use serde::Deserialize;
use std::net::SocketAddr;

pub use persistence::db::DatabaseConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// JWT authentication configuration
    pub jwt: JwtAuthConfig,
    /// Attendance pipeline configuration
    #[serde(default)]
    pub attendance: AttendanceConfig,
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
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing tokens
    pub private_key: String,

    /// RSA public key in PEM format for verifying tokens
    pub public_key: String,

    /// Access token expiration in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Refresh token expiration in seconds (default: 2592000 = 30 days)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    /// How long an unknown tag sighting is kept before the retention sweep
    /// removes it (default: 30 days).
    #[serde(default = "default_unknown_tag_retention_days")]
    pub unknown_tag_retention_days: u32,

    /// Default page size for attendance listings.
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Hard cap on attendance listing page size.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            unknown_tag_retention_days: default_unknown_tag_retention_days(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
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
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}
fn default_refresh_token_expiry() -> i64 {
    2592000 // 30 days
}
fn default_jwt_leeway() -> u64 {
    30 // 30 seconds for clock skew tolerance
}
fn default_unknown_tag_retention_days() -> u32 {
    30
}
fn default_page_size() -> i64 {
    50
}
fn default_max_page_size() -> i64 {
    200
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with DM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("DM").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Creates a config entirely from embedded defaults and overrides,
    /// without relying on config files (which may not be accessible during
    /// tests).
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [jwt]
            private_key = "test-secret"
            public_key = "test-secret"
            access_token_expiry_secs = 3600
            refresh_token_expiry_secs = 2592000
            leeway_secs = 30

            [attendance]
            unknown_tag_retention_days = 30
            default_page_size = 50
            max_page_size = 200
        "#;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            defaults,
            config::FileFormat::Toml,
        ));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validates cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("database.url must be set".to_string());
        }
        if self.jwt.private_key.is_empty() || self.jwt.public_key.is_empty() {
            return Err("jwt.private_key and jwt.public_key must be set".to_string());
        }
        if self.attendance.unknown_tag_retention_days == 0 {
            return Err("attendance.unknown_tag_retention_days must be at least 1".to_string());
        }
        if self.attendance.max_page_size < self.attendance.default_page_size {
            return Err("attendance.max_page_size must be >= default_page_size".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.attendance.unknown_tag_retention_days, 30);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::load_for_test(&[
            ("server.port", "9090"),
            ("attendance.unknown_tag_retention_days", "7"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.attendance.unknown_tag_retention_days, 7);
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let config =
            Config::load_for_test(&[("attendance.unknown_tag_retention_days", "0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[("server.host", "127.0.0.1")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
    }
}
