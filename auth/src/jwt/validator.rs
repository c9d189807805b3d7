use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::decode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::Claims;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Algorithm names accepted in a token header. Anything else, including
/// `none` and asymmetric algorithms, is rejected before signature checks.
const HMAC_ALGORITHMS: [(&str, Algorithm); 3] = [
    ("HS256", Algorithm::HS256),
    ("HS384", Algorithm::HS384),
    ("HS512", Algorithm::HS512),
];

/// Just enough of the JOSE header to read the declared algorithm.
#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Verifies access tokens and recovers their claims.
///
/// Checks run in a fixed order: structure, declared algorithm, signature,
/// claim shape, expiry. Expiry is evaluated against the validator's clock
/// with no leeway.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    /// Create a validator for tokens signed with `secret`.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a validator with an explicit clock.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.iter().map(|(_, alg)| *alg).collect();
        // Expiry is checked against our own clock once the claims are typed
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }

    /// Validate a token and return its claims.
    ///
    /// # Arguments
    /// * `token` - Compact JWT string
    ///
    /// # Returns
    /// Typed claims with a non-empty subject
    ///
    /// # Errors
    /// * `TokenMalformed` - Token is not three decodable segments
    /// * `UnexpectedAlgorithm` - Header declares a non-HMAC algorithm
    /// * `SignatureInvalid` - Signature does not match the secret
    /// * `ClaimInvalid` - `sub` or `exp` missing or of the wrong type
    /// * `TokenExpired` - `exp` is not in the future
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        check_declared_algorithm(token)?;

        let token_data = decode::<serde_json::Value>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?;

        let claims = Claims::from_payload(token_data.claims)?;

        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::TokenExpired);
        }

        Ok(claims)
    }
}

fn check_declared_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let header = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(_), Some(_), None) => header,
        _ => {
            return Err(TokenError::TokenMalformed(
                "expected three dot-separated segments".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::TokenMalformed(format!("header is not base64url: {}", e)))?;
    let declared: DeclaredHeader = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::TokenMalformed(format!("header is not valid JSON: {}", e)))?;

    if HMAC_ALGORITHMS
        .iter()
        .any(|(name, _)| *name == declared.alg)
    {
        Ok(())
    } else {
        Err(TokenError::UnexpectedAlgorithm(declared.alg))
    }
}

fn classify(error: JsonWebTokenError) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm(error.to_string()),
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::ClaimInvalid(format!("missing claim: {}", claim))
        }
        _ => TokenError::TokenMalformed(error.to_string()),
    }
}
