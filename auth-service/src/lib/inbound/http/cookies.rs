use auth::ACCESS_TOKEN_COOKIE;
use auth::ACCESS_TOKEN_LIFETIME_SECS;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;

use crate::config::CookieConfig;

/// `access_token` cookie carrying a freshly issued token.
///
/// Lives exactly as long as the token and is never readable from scripts.
pub fn access_token_cookie(token: String, config: &CookieConfig) -> Cookie<'static> {
    with_deployment_attributes(
        Cookie::build((ACCESS_TOKEN_COOKIE, token))
            .max_age(time::Duration::seconds(ACCESS_TOKEN_LIFETIME_SECS))
            .build(),
        config,
    )
}

/// Cookie that tells the browser to drop `access_token`.
pub fn expired_access_token_cookie(config: &CookieConfig) -> Cookie<'static> {
    with_deployment_attributes(
        Cookie::build((ACCESS_TOKEN_COOKIE, ""))
            .max_age(time::Duration::ZERO)
            .build(),
        config,
    )
}

fn with_deployment_attributes(mut cookie: Cookie<'static>, config: &CookieConfig) -> Cookie<'static> {
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(config.secure);
    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}
