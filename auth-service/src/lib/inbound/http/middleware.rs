use std::sync::Arc;

use auth::AuthGate;
use auth::GateRejection;
use auth::PrincipalLookup;
use auth::ACCESS_TOKEN_COOKIE;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::handlers::ApiError;

/// Middleware that runs the auth gate and binds the authenticated principal
/// into request extensions as `auth::AuthenticatedPrincipal`.
///
/// Rejections answer with `{"error": ...}`; the downstream handler is not run.
pub async fn require_auth<L>(
    State(gate): State<Arc<AuthGate<L>>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    L: PrincipalLookup,
{
    let token = jar.get(ACCESS_TOKEN_COOKIE).map(|cookie| cookie.value());

    let principal = gate.admit(token).await.map_err(|rejection| {
        log_rejection(&rejection);
        ApiError::from(rejection)
    })?;

    tracing::debug!(principal_id = %principal.id, "Request admitted");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn log_rejection(rejection: &GateRejection) {
    match rejection {
        GateRejection::PrincipalLookupFailed(e) => {
            tracing::error!(stage = rejection.stage(), error = %e, "Principal lookup failed");
        }
        GateRejection::InvalidToken(e) => {
            tracing::warn!(stage = rejection.stage(), reason = %e, "Rejected invalid token");
        }
        GateRejection::TokenMissing | GateRejection::PrincipalNotFound => {
            tracing::warn!(stage = rejection.stage(), reason = %rejection, "Request rejected");
        }
    }
}
