use std::sync::Arc;

use auth::AuthGate;
use auth::Authenticator;
use auth::TokenValidator;
use auth_service::config::Config;
use auth_service::domain::user::principal::UserPrincipalLookup;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::HttpSettings;
use auth_service::outbound::repositories::PostgresUserRepository;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        request_timeout_secs = config.server.request_timeout_secs,
        lookup_timeout_ms = config.server.lookup_timeout_ms,
        cookie_secure = config.cookie.secure,
        cors_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );
    if !config.cookie.secure {
        tracing::warn!("access_token cookie is issued without the Secure attribute");
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    // The secret is read once here and handed to the issuer and validator
    let secret = config.jwt.secret.expose_secret().as_bytes();
    let authenticator = Arc::new(Authenticator::new(secret));
    let token_validator = TokenValidator::new(secret);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        authenticator,
    ));
    let auth_gate = Arc::new(
        AuthGate::new(
            token_validator,
            Arc::new(UserPrincipalLookup::new(user_repository)),
        )
        .with_lookup_timeout(config.server.lookup_timeout()),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        user_service,
        auth_gate,
        HttpSettings {
            cookie: config.cookie.clone(),
            cors: config.cors.clone(),
            request_timeout: config.server.request_timeout(),
        },
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
