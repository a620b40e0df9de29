use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::config::AuthConfig;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenKind;

/// Access and refresh tokens issued together for one identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived token for resource access
    pub access_token: String,
    /// Long-lived token for minting a new pair
    pub refresh_token: String,
}

/// Issues signed token pairs.
///
/// Owns the codec built from the configured secret together with the token
/// lifetimes, so nothing outside this crate ever handles the secret.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `config` - Signing secret and token lifetimes
    ///
    /// # Returns
    /// Configured TokenIssuer instance
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwt_handler: JwtHandler::new(config.secret()),
            access_token_ttl: config.access_token_ttl(),
            refresh_token_ttl: config.refresh_token_ttl(),
        }
    }

    /// Issue an access token and a refresh token stamped with the same instant.
    ///
    /// # Arguments
    /// * `user_id` - User identifier
    /// * `email` - User email
    ///
    /// # Returns
    /// TokenPair bound to `user_id` and `email`
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be built or signing failed
    pub fn issue_pair(&self, user_id: &str, email: &str) -> Result<TokenPair, JwtError> {
        let issued_at = Utc::now();

        let access = Claims::new(
            user_id,
            email,
            TokenKind::Access,
            issued_at,
            self.access_token_ttl,
        )?;
        let refresh = Claims::new(
            user_id,
            email,
            TokenKind::Refresh,
            issued_at,
            self.refresh_token_ttl,
        )?;

        Ok(TokenPair {
            access_token: self.jwt_handler.encode(&access)?,
            refresh_token: self.jwt_handler.encode(&refresh)?,
        })
    }

    /// Codec used to sign and verify this issuer's tokens.
    pub fn codec(&self) -> &JwtHandler {
        &self.jwt_handler
    }
}
