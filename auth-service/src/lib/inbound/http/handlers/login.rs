use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SuccessData;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::cookies::access_token_cookie;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Verify credentials and deliver the access token as an `HttpOnly` cookie.
///
/// The token is never placed in the response body.
pub async fn login<UR>(
    State(state): State<AppState<UR>>,
    jar: CookieJar,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<SuccessData>), ApiError>
where
    UR: UserRepository,
{
    let Json(body) = body?;

    let access_token = state
        .user_service
        .login(LoginCommand::new(body.email, body.password))
        .await
        .map_err(|e| match e {
            UserError::Token(err) => {
                tracing::error!(error = %err, "Token generation failed");
                ApiError::InternalServerError("failed to generate access token".to_string())
            }
            _ => ApiError::from(e),
        })?;

    Ok((
        jar.add(access_token_cookie(access_token, &state.cookie_config)),
        ApiSuccess::new(StatusCode::OK, SuccessData { success: true }),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}
