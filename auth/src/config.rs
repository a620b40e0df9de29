use std::fmt;

use chrono::Duration;
use thiserror::Error;

use crate::jwt::TokenKind;

/// Default lifetime of an access token.
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Default lifetime of a refresh token (7 days).
pub const DEFAULT_REFRESH_TOKEN_TTL_HOURS: i64 = 7 * 24;

/// Upper bound accepted for either token lifetime.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// Rejected token lifetime.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("{kind} token lifetime must be at least one second")]
    TtlTooShort { kind: TokenKind },

    #[error("{kind} token lifetime must not exceed {} days", MAX_TOKEN_TTL_DAYS)]
    TtlTooLong { kind: TokenKind },
}

/// Token signing configuration.
///
/// Built once at startup and handed to the [`TokenIssuer`](crate::TokenIssuer).
/// The secret is only readable inside this crate and is redacted from `Debug` output.
/// Lifetimes always lie between one second and [`MAX_TOKEN_TTL_DAYS`].
#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl AuthConfig {
    /// Create a configuration with default token lifetimes.
    ///
    /// # Arguments
    /// * `secret` - HMAC signing secret (should be at least 32 bytes for HS256)
    ///
    /// # Returns
    /// AuthConfig with a 15 minute access lifetime and a 7 day refresh lifetime
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl: Duration::hours(DEFAULT_REFRESH_TOKEN_TTL_HOURS),
        }
    }

    /// Set access token lifetime.
    ///
    /// # Errors
    /// * `TtlTooShort` - Less than one second
    /// * `TtlTooLong` - More than [`MAX_TOKEN_TTL_DAYS`]
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Result<Self, AuthConfigError> {
        self.access_token_ttl = checked_ttl(TokenKind::Access, ttl)?;
        Ok(self)
    }

    /// Set refresh token lifetime.
    ///
    /// # Errors
    /// * `TtlTooShort` - Less than one second
    /// * `TtlTooLong` - More than [`MAX_TOKEN_TTL_DAYS`]
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Result<Self, AuthConfigError> {
        self.refresh_token_ttl = checked_ttl(TokenKind::Refresh, ttl)?;
        Ok(self)
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

fn checked_ttl(kind: TokenKind, ttl: Duration) -> Result<Duration, AuthConfigError> {
    if ttl < Duration::seconds(1) {
        return Err(AuthConfigError::TtlTooShort { kind });
    }
    if ttl > Duration::days(MAX_TOKEN_TTL_DAYS) {
        return Err(AuthConfigError::TtlTooLong { kind });
    }
    Ok(ttl)
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}
