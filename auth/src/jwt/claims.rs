use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Discriminates what a token may be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, grants access to protected resources
    Access,
    /// Long-lived, only usable to mint a new token pair
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity claims signed into every token.
///
/// A token carries one immutable snapshot of these fields. They are only settable
/// through [`Claims::new`], which refuses any lifetime that would not leave
/// `exp > iat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier
    user_id: String,

    /// Email of the user at issuance time
    email: String,

    /// Token kind
    #[serde(rename = "type")]
    kind: TokenKind,

    /// Issued at (Unix timestamp)
    iat: i64,

    /// Not before (Unix timestamp)
    nbf: i64,

    /// Expiration time (Unix timestamp)
    exp: i64,
}

impl Claims {
    /// Create claims valid from `issued_at` for `ttl`.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier
    /// * `email` - User email, informational only
    /// * `kind` - Access or refresh
    /// * `issued_at` - Issuance instant, also used as not-before
    /// * `ttl` - Validity duration, at least one second
    ///
    /// # Errors
    /// * `EncodingFailed` - `ttl` is shorter than a second or the expiry overflows
    pub fn new(
        user_id: impl ToString,
        email: impl ToString,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        if ttl < Duration::seconds(1) {
            return Err(JwtError::EncodingFailed(format!(
                "{} token lifetime must be at least one second",
                kind
            )));
        }

        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!("{} token expiry is out of range", kind))
        })?;
        let iat = issued_at.timestamp();

        Ok(Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            kind,
            iat,
            nbf: iat,
            exp: expires_at.timestamp(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn not_before(&self) -> i64 {
        self.nbf
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}
