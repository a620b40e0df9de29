use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::AuthConfig;
use auth::Claims;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenKind;
use auth::TokenPair;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::user::models::User;
use crate::user::ports::UserRepository;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Stateless JWT authentication over a user store.
///
/// Holds no per-request state: the issuer and its configuration are fixed at
/// construction and shared by every request.
pub struct AuthenticationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    issuer: TokenIssuer,
    password_hasher: PasswordHasher,
    // Verified against for unknown emails, built on first use
    decoy_hash: Arc<OnceLock<String>>,
}

impl<UR> AuthenticationService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `repository` - User store used for lookups by email
    /// * `config` - Signing secret and token lifetimes
    pub fn new(repository: Arc<UR>, config: &AuthConfig) -> Self {
        Self {
            repository,
            issuer: TokenIssuer::new(config),
            password_hasher: PasswordHasher::new(),
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    async fn find_user(&self, email: &str) -> Result<User, AuthError> {
        self.repository
            .find_by_email(email)
            .await
            .map_err(|e| {
                tracing::error!(email = %email, error = %e, "Failed to look up user by email");
                AuthError::from(e)
            })?
            .ok_or_else(|| AuthError::UserNotFound(email.to_string()))
    }

    async fn verify_password(&self, user: &User, password: &str) -> Result<(), AuthError> {
        let hasher = self.password_hasher;
        let candidate = password.to_string();
        let stored_hash = user.password_hash.clone();

        let verified = tokio::task::spawn_blocking(move || hasher.verify(&candidate, &stored_hash))
            .await
            .map_err(|e| AuthError::PasswordTask(e.to_string()))?;

        match verified {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(user_id = %user.id, "Invalid credentials attempt");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn burn_verification(&self, password: &str) {
        let hasher = self.password_hasher;
        let candidate = password.to_string();
        let decoy_hash = Arc::clone(&self.decoy_hash);

        let result = tokio::task::spawn_blocking(move || {
            let hash = decoy_hash.get_or_init(|| hasher.hash(DECOY_PASSWORD).unwrap_or_default());
            let _ = hasher.verify(&candidate, hash);
        })
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, "Decoy password verification task failed");
        }
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        self.issuer
            .issue_pair(&user.id.to_string(), user.email.as_str())
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to generate token pair");
                AuthError::from(e)
            })
    }
}

#[async_trait]
impl<UR> AuthenticationServicePort for AuthenticationService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = match self.find_user(email).await {
            Ok(user) => user,
            Err(e) => {
                if matches!(e, AuthError::UserNotFound(_)) {
                    self.burn_verification(password).await;
                }
                tracing::warn!(email = %email, error = %e, "Login failed");
                return Err(e);
            }
        };

        self.verify_password(&user, password).await?;

        let pair = self.issue_pair(&user)?;

        tracing::info!(user_id = %user.id, email = %email, "User authenticated");
        Ok(pair)
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.issuer.codec().decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError::from(e)
        })?;

        tracing::debug!(
            user_id = %claims.user_id(),
            token_type = %claims.kind(),
            "Token validated"
        );
        Ok(claims)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validate_token(refresh_token)?;

        if claims.kind() != TokenKind::Refresh {
            tracing::warn!(
                user_id = %claims.user_id(),
                expected = %TokenKind::Refresh,
                actual = %claims.kind(),
                "Invalid token type for refresh"
            );
            return Err(AuthError::InvalidTokenType {
                expected: TokenKind::Refresh,
                actual: claims.kind(),
            });
        }

        let user = self.find_user(claims.email()).await.map_err(|e| {
            tracing::warn!(
                user_id = %claims.user_id(),
                email = %claims.email(),
                error = %e,
                "Token refresh failed"
            );
            e
        })?;

        let pair = self.issue_pair(&user)?;

        tracing::info!(user_id = %user.id, email = %user.email, "Token refreshed");
        Ok(pair)
    }
}
