use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::ApiSuccess;
use super::SuccessData;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::cookies::expired_access_token_cookie;
use crate::inbound::http::router::AppState;

/// Expire the `access_token` cookie on the client.
///
/// Tokens are stateless: a copy of the token stays valid until its `exp`.
pub async fn logout<UR>(
    State(state): State<AppState<UR>>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<SuccessData>)
where
    UR: UserRepository,
{
    (
        jar.add(expired_access_token_cookie(&state.cookie_config)),
        ApiSuccess::new(StatusCode::OK, SuccessData { success: true }),
    )
}
