//! Request gate for protected endpoints.
//!
//! A request moves through `extract -> validate -> resolve -> admit`. The
//! first failing step rejects the request and nothing is retried.

pub mod errors;
pub mod lookup;

use std::sync::Arc;
use std::time::Duration;

pub use errors::GateRejection;
pub use lookup::LookupError;
pub use lookup::PrincipalLookup;

use crate::jwt::TokenValidator;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Upper bound on a single principal lookup unless configured otherwise.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity bound to a request once the gate admits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub id: String,
}

/// Admits or rejects requests based on the presented token and on the
/// referenced principal still existing.
pub struct AuthGate<L: PrincipalLookup> {
    validator: TokenValidator,
    lookup: Arc<L>,
    lookup_timeout: Duration,
}

impl<L: PrincipalLookup> AuthGate<L> {
    pub fn new(validator: TokenValidator, lookup: Arc<L>) -> Self {
        Self {
            validator,
            lookup,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Bound principal lookups by `timeout`; an overrun counts as a lookup failure.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Run the gate for one request.
    ///
    /// # Arguments
    /// * `token` - Token read from the credential cookie, if any
    ///
    /// # Returns
    /// The principal to bind into the request
    ///
    /// # Errors
    /// * `TokenMissing` - No token was presented
    /// * `InvalidToken` - Token failed validation
    /// * `PrincipalNotFound` - Subject no longer exists
    /// * `PrincipalLookupFailed` - Store failed or timed out
    pub async fn admit(&self, token: Option<&str>) -> Result<AuthenticatedPrincipal, GateRejection> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(GateRejection::TokenMissing)?;

        let claims = self
            .validator
            .validate(token)
            .map_err(GateRejection::InvalidToken)?;

        let principal = tokio::time::timeout(
            self.lookup_timeout,
            self.lookup.find_by_id(claims.subject()),
        )
        .await
        .map_err(|_| {
            LookupError(format!(
                "principal lookup timed out after {}ms",
                self.lookup_timeout.as_millis()
            ))
        })??;

        if principal.is_none() {
            return Err(GateRejection::PrincipalNotFound);
        }

        Ok(AuthenticatedPrincipal { id: claims.sub })
    }
}
