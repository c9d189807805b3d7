use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Access token claims.
///
/// Only the two claims the gate relies on are carried: the principal
/// identifier and the expiration instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject` expiring `lifetime` after `now`.
    ///
    /// # Errors
    /// * `ClaimInvalid` - Subject is empty
    pub fn new(
        subject: impl Into<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let sub = subject.into();
        if sub.is_empty() {
            return Err(TokenError::ClaimInvalid(
                "subject must not be empty".to_string(),
            ));
        }

        Ok(Self {
            sub,
            exp: (now + lifetime).timestamp(),
        })
    }

    /// Decode a verified claims payload into typed claims.
    ///
    /// This is the only place the raw payload is inspected.
    ///
    /// # Errors
    /// * `ClaimInvalid` - `sub` missing, empty or not a string, or `exp` missing or not an integer
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, TokenError> {
        let claims: Claims = serde_json::from_value(payload)
            .map_err(|e| TokenError::ClaimInvalid(e.to_string()))?;

        if claims.sub.is_empty() {
            return Err(TokenError::ClaimInvalid(
                "subject must not be empty".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Subject as a string slice.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Check if token is expired.
    ///
    /// A token is expired at its expiration instant, not only after it.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
