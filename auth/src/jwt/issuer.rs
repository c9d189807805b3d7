use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Lifetime of an access token in seconds.
pub const ACCESS_TOKEN_LIFETIME_SECS: i64 = 15 * 60;

/// Mints signed access tokens.
///
/// Tokens are HS256 JWTs carrying `sub` and `exp`. The issuer is stateless
/// and can be shared between tasks behind an `Arc`.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    has_secret: bool,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer signing with `secret` and reading the wall clock.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it once at startup and never log it
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create an issuer with an explicit clock.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            has_secret: !secret.is_empty(),
            clock,
        }
    }

    /// Token lifetime.
    pub fn lifetime() -> Duration {
        Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS)
    }

    /// Issue a token asserting `subject`.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier, must be non-empty
    ///
    /// # Returns
    /// Compact JWT string
    ///
    /// # Errors
    /// * `ClaimInvalid` - Subject is empty
    /// * `SigningError` - No secret configured or signing failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        if !self.has_secret {
            return Err(TokenError::SigningError(
                "signing secret is not configured".to_string(),
            ));
        }

        let claims = Claims::new(subject, self.clock.now(), Self::lifetime())?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::Utc;

    use super::*;
    use crate::clock::ManualClock;

    fn decode_segment(segment: &str) -> serde_json::Value {
        let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_issue_wire_format() {
        let now = Utc::now();
        let issuer = TokenIssuer::with_clock(
            b"my_secret_key_at_least_32_bytes_long!",
            Arc::new(ManualClock::new(now)),
        );

        let token = issuer.issue("user123").expect("Failed to issue token");
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header = decode_segment(parts[0]);
        assert_eq!(header["alg"], "HS256");

        let payload = decode_segment(parts[1]);
        assert_eq!(payload["sub"], "user123");
        assert_eq!(
            payload["exp"].as_i64(),
            Some(now.timestamp() + ACCESS_TOKEN_LIFETIME_SECS)
        );
    }

    #[test]
    fn test_issue_empty_subject() {
        let issuer = TokenIssuer::new(b"my_secret_key_at_least_32_bytes_long!");
        let result = issuer.issue("");
        assert!(matches!(result, Err(TokenError::ClaimInvalid(_))));
    }

    #[test]
    fn test_issue_without_secret() {
        let issuer = TokenIssuer::new(b"");
        let result = issuer.issue("user123");
        assert!(matches!(result, Err(TokenError::SigningError(_))));
    }
}
