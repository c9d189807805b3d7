use std::sync::Arc;
use std::time::Duration;

use auth::AuthGate;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::current_user::get_current_user;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::middleware::require_auth;
use crate::config::CookieConfig;
use crate::config::CorsConfig;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::principal::UserPrincipalLookup;
use crate::domain::user::service::UserService;

pub struct AppState<UR>
where
    UR: UserRepository,
{
    pub user_service: Arc<UserService<UR>>,
    pub auth_gate: Arc<AuthGate<UserPrincipalLookup<UR>>>,
    pub cookie_config: CookieConfig,
}

impl<UR> Clone for AppState<UR>
where
    UR: UserRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            auth_gate: Arc::clone(&self.auth_gate),
            cookie_config: self.cookie_config.clone(),
        }
    }
}

/// HTTP concerns that come from deployment configuration.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cookie: CookieConfig,
    pub cors: CorsConfig,
    pub request_timeout: Duration,
}

pub fn create_router<UR>(
    user_service: Arc<UserService<UR>>,
    auth_gate: Arc<AuthGate<UserPrincipalLookup<UR>>>,
    settings: HttpSettings,
) -> Router
where
    UR: UserRepository,
{
    let state = AppState {
        user_service,
        auth_gate,
        cookie_config: settings.cookie,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<UR>))
        .route("/api/auth/login", post(login::<UR>))
        .route("/api/auth/logout", post(logout::<UR>));

    let protected_routes = Router::new()
        .route("/api/user", get(get_current_user::<UR>))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.auth_gate),
            require_auth::<UserPrincipalLookup<UR>>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers stay out of the span: they carry the access token cookie
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(trace_layer)
        .layer(cors_layer(&settings.cors))
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
