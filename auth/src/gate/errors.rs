use http::StatusCode;
use thiserror::Error;

use super::lookup::LookupError;
use crate::jwt::TokenError;

/// Reason a request was turned away by the gate.
///
/// Display strings are what the caller sees. Token failures all render the
/// same message; the specific `TokenError` is kept for logging only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateRejection {
    #[error("token missing")]
    TokenMissing,

    #[error("invalid token")]
    InvalidToken(#[source] TokenError),

    #[error("user not found")]
    PrincipalNotFound,

    #[error("{0}")]
    PrincipalLookupFailed(#[from] LookupError),
}

impl GateRejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateRejection::TokenMissing
            | GateRejection::InvalidToken(_)
            | GateRejection::PrincipalNotFound => StatusCode::UNAUTHORIZED,
            GateRejection::PrincipalLookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Gate transition that produced the rejection.
    pub fn stage(&self) -> &'static str {
        match self {
            GateRejection::TokenMissing => "extract",
            GateRejection::InvalidToken(_) => "validate",
            GateRejection::PrincipalNotFound | GateRejection::PrincipalLookupFailed(_) => {
                "resolve"
            }
        }
    }
}
