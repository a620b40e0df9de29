use std::env;

use auth::AuthConfig;
use auth::AuthConfigError;
use auth::TokenKind;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for todo-service.
///
/// Loaded once at startup; nothing here is reloaded at runtime.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

/// PostgreSQL database configuration.
///
/// Without a URL the service keeps users in memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,
    #[serde(default = "default_refresh_token_expiry_hours")]
    pub refresh_token_expiry_hours: i64,
}

fn default_access_token_expiry_minutes() -> i64 {
    auth::config::DEFAULT_ACCESS_TOKEN_TTL_MINUTES
}

fn default_refresh_token_expiry_hours() -> i64 {
    auth::config::DEFAULT_REFRESH_TOKEN_TTL_HOURS
}

impl JwtConfig {
    /// Build the signing configuration handed to the token issuer.
    ///
    /// # Errors
    /// * `TtlTooShort` / `TtlTooLong` - A configured lifetime is out of bounds
    pub fn auth_config(&self) -> Result<AuthConfig, AuthConfigError> {
        let access_ttl = lifetime(
            TokenKind::Access,
            self.access_token_expiry_minutes,
            Duration::try_minutes,
        )?;
        let refresh_ttl = lifetime(
            TokenKind::Refresh,
            self.refresh_token_expiry_hours,
            Duration::try_hours,
        )?;

        AuthConfig::new(self.secret.as_bytes())
            .with_access_token_ttl(access_ttl)?
            .with_refresh_token_ttl(refresh_ttl)
    }
}

// Values too large for a Duration are rejected by sign instead of panicking
fn lifetime(
    kind: TokenKind,
    value: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> Result<Duration, AuthConfigError> {
    match to_duration(value) {
        Some(ttl) => Ok(ttl),
        None if value < 0 => Err(AuthConfigError::TtlTooShort { kind }),
        None => Err(AuthConfigError::TtlTooLong { kind }),
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field(
                "access_token_expiry_minutes",
                &self.access_token_expiry_minutes,
            )
            .field(
                "refresh_token_expiry_hours",
                &self.refresh_token_expiry_hours,
            )
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_lifetimes_default_when_omitted() {
        let config = from_toml(
            r#"
            [server]
            http_port = 8080

            [jwt]
            secret = "test-secret"
            "#,
        )
        .expect("Failed to load config");

        assert!(config.database.url.is_none());
        assert_eq!(config.jwt.access_token_expiry_minutes, 15);
        assert_eq!(config.jwt.refresh_token_expiry_hours, 168);
    }

    #[test]
    fn test_auth_config_uses_lifetimes() {
        let config = from_toml(
            r#"
            [server]
            http_port = 8080

            [jwt]
            secret = "test-secret"
            access_token_expiry_minutes = 5
            refresh_token_expiry_hours = 1
            "#,
        )
        .expect("Failed to load config");

        let auth_config = config.jwt.auth_config().expect("Lifetimes within bounds");
        assert_eq!(auth_config.access_token_ttl(), chrono::Duration::minutes(5));
        assert_eq!(auth_config.refresh_token_ttl(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_auth_config_rejects_out_of_range_lifetimes() {
        let jwt = |access: i64, refresh: i64| JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_minutes: access,
            refresh_token_expiry_hours: refresh,
        };

        assert_eq!(
            jwt(0, 168).auth_config().unwrap_err(),
            AuthConfigError::TtlTooShort {
                kind: TokenKind::Access
            }
        );
        assert_eq!(
            jwt(15, -1).auth_config().unwrap_err(),
            AuthConfigError::TtlTooShort {
                kind: TokenKind::Refresh
            }
        );
        assert_eq!(
            jwt(i64::MIN, 168).auth_config().unwrap_err(),
            AuthConfigError::TtlTooShort {
                kind: TokenKind::Access
            }
        );
        assert_eq!(
            jwt(15, 1_000_000_000_000).auth_config().unwrap_err(),
            AuthConfigError::TtlTooLong {
                kind: TokenKind::Refresh
            }
        );
        assert_eq!(
            jwt(i64::MAX, 168).auth_config().unwrap_err(),
            AuthConfigError::TtlTooLong {
                kind: TokenKind::Access
            }
        );
    }

    #[test]
    fn test_default_file_leaves_database_unset() {
        let config = from_toml(include_str!("../../config/default.toml"))
            .expect("Failed to load default config");

        assert!(config.database.url.is_none());
        assert!(config.jwt.auth_config().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = from_toml(
            r#"
            [server]
            http_port = 8080

            [jwt]
            secret = "do-not-print-me"
            "#,
        )
        .unwrap();

        assert!(!format!("{:?}", config).contains("do-not-print-me"));
    }
}
