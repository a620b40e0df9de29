//! Authentication primitives for the todo service.
//!
//! Provides the stateless building blocks the service wires together:
//! - Password hashing and verification (Argon2id)
//! - HS256 JWT encoding and decoding of identity claims
//! - Access/refresh token pair issuance
//!
//! Nothing here performs I/O. User lookup and token-type business rules live in the
//! service that consumes this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Issuing and validating tokens
//! ```
//! use auth::{AuthConfig, TokenIssuer, TokenKind};
//!
//! let config = AuthConfig::new(b"secret_key_at_least_32_bytes_long!".to_vec());
//! let issuer = TokenIssuer::new(&config);
//!
//! let pair = issuer.issue_pair("user123", "alice@example.com").unwrap();
//! let claims = issuer.codec().decode(&pair.access_token).unwrap();
//! assert_eq!(claims.user_id(), "user123");
//! assert_eq!(claims.kind(), TokenKind::Access);
//! ```

pub mod config;
pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use config::AuthConfig;
pub use config::AuthConfigError;
pub use issuer::TokenIssuer;
pub use issuer::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
