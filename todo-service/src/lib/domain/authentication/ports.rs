use async_trait::async_trait;
use auth::Claims;
use auth::TokenPair;

use crate::domain::authentication::errors::AuthError;

/// Port for login, token validation and refresh.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a token pair.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `password` - Plaintext candidate password
    ///
    /// # Returns
    /// Fresh access and refresh tokens
    ///
    /// # Errors
    /// * `UserNotFound` - No account with this email (after a decoy password check)
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenCreationFailed` - Signing failed
    /// * `Repository` - User store lookup failed
    async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, AuthError>;

    /// Verify signature and expiry of a token and return its claims.
    ///
    /// Does not check the token kind.
    ///
    /// # Errors
    /// * `ExpiredToken` - Token is past its expiry
    /// * `InvalidToken` - Malformed, tampered or foreign token
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Exchange a refresh token for a brand-new token pair.
    ///
    /// The presented refresh token is not revoked and stays valid until it expires.
    ///
    /// # Errors
    /// * `ExpiredToken` / `InvalidToken` - Token failed validation
    /// * `InvalidTokenType` - Token is not a refresh token
    /// * `UserNotFound` - The account no longer exists
    /// * `TokenCreationFailed` - Signing failed
    /// * `Repository` - User store lookup failed
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}
