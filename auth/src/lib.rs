//! Authentication core
//!
//! Stateless access-token authentication:
//! - Password hashing (Argon2id)
//! - Access token issuance and validation (HS256 JWT, 15 minute lifetime)
//! - A request gate that validates the token and checks the principal still exists
//!
//! Storage is reached only through [`PrincipalLookup`], which each service implements.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{TokenIssuer, TokenValidator};
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let token = TokenIssuer::new(secret).issue("user123").unwrap();
//! let claims = TokenValidator::new(secret).validate(&token).unwrap();
//! assert_eq!(claims.subject(), "user123");
//! ```

pub mod authenticator;
pub mod clock;
pub mod gate;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use gate::AuthGate;
pub use gate::AuthenticatedPrincipal;
pub use gate::GateRejection;
pub use gate::LookupError;
pub use gate::PrincipalLookup;
pub use gate::ACCESS_TOKEN_COOKIE;
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use jwt::ACCESS_TOKEN_LIFETIME_SECS;
pub use password::PasswordError;
pub use password::PasswordHasher;
