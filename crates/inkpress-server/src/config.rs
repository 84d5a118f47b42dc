//! Server configuration.
//!
//! Configuration is read from a TOML file (default `inkpress.toml`) with
//! environment overrides under the `INKPRESS` prefix, `__` separating
//! nesting levels (`INKPRESS__AUTH__SECRET`, `INKPRESS__SERVER__PORT`).

use std::net::SocketAddr;

use inkpress_auth::AuthConfig;
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener settings.
    pub server: ServerConfig,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Auth core settings.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid listener address or an invalid auth
    /// section (including a missing signing secret).
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.addr()?;
        self.auth.validate()?;
        Ok(())
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if host/port do not form a valid socket address.
    pub fn addr(&self) -> Result<SocketAddr, ConfigLoadError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| {
                ConfigLoadError::InvalidValue(format!(
                    "server.host/server.port do not form a valid address: {}:{}",
                    self.server.host, self.server.port
                ))
            })
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (IP address).
    pub host: String,

    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The file or environment sources could not be read or parsed.
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    /// The auth section failed validation.
    #[error(transparent)]
    Auth(#[from] inkpress_auth::ConfigError),

    /// A value is structurally invalid.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Loads and validates the application configuration.
///
/// # Errors
///
/// Returns an error if a source fails to parse or validation rejects the
/// result.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigLoadError> {
    let path = path.unwrap_or("inkpress.toml");

    let cfg: AppConfig = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("INKPRESS")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret() -> AppConfig {
        AppConfig {
            auth: AuthConfig {
                secret: "integration-test-secret-32-bytes!".to_string(),
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_default_config_fails_without_secret() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Auth(_)));
    }

    #[test]
    fn test_config_with_secret_validates() {
        assert!(with_secret().validate().is_ok());
    }

    #[test]
    fn test_default_addr() {
        let addr = with_secret().addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_bad_host_rejected() {
        let mut cfg = with_secret();
        cfg.server.host = "not a host".to_string();
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigLoadError::InvalidValue(_)
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = with_secret();
        let value = serde_json::to_value(&cfg).unwrap();
        let parsed: AppConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.server.port, cfg.server.port);
        assert_eq!(parsed.auth.secret, cfg.auth.secret);
        assert_eq!(parsed.logging.level, cfg.logging.level);
    }
}
