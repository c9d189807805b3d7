use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthGate;
use auth::Authenticator;
use auth::TokenIssuer;
use auth::TokenValidator;
use auth_service::config::CookieConfig;
use auth_service::config::CorsConfig;
use auth_service::domain::user::errors::UserError;
use auth_service::domain::user::models::User;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::ports::UserRepository;
use auth_service::domain::user::principal::UserPrincipalLookup;
use auth_service::domain::user::service::UserService;
use auth_service::inbound::http::router::create_router;
use auth_service::inbound::http::router::HttpSettings;
use reqwest::header::HeaderValue;
use reqwest::header::SET_COOKIE;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over an in-memory user store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));
        let user_service = Arc::new(UserService::new(Arc::clone(&repository), authenticator));
        let auth_gate = Arc::new(AuthGate::new(
            TokenValidator::new(TEST_SECRET),
            Arc::new(UserPrincipalLookup::new(Arc::clone(&repository))),
        ));

        let router = create_router(
            user_service,
            auth_gate,
            HttpSettings {
                cookie: CookieConfig::default(),
                cors: CorsConfig {
                    allowed_origins: vec!["http://localhost:3000".to_string()],
                },
                request_timeout: Duration::from_secs(10),
            },
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(TEST_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying an `access_token` cookie
    pub fn get_with_token(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path)
            .header(reqwest::header::COOKIE, format!("access_token={}", token))
    }

    /// Register a user and return its id
    pub async fn register(&self, username: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        self.repository
            .id_for_email(email)
            .expect("registered user should be stored")
    }

    /// Helper to POST credentials to the login endpoint
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// `Set-Cookie` header value for `access_token`, if the response carries one
pub fn access_token_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value: &HeaderValue| value.to_str().ok())
        .find(|value| value.starts_with("access_token="))
        .map(str::to_string)
}

/// Token value from an `access_token=<value>; ...` header
pub fn cookie_value(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("access_token="))
        .unwrap_or_default()
        .to_string()
}

/// User store backing the spawned server
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn id_for_email(&self, email: &str) -> Option<String> {
        self.users
            .read()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .map(|user| user.id.to_string())
    }

    pub fn remove(&self, id: &str) {
        let id = UserId::from_string(id).unwrap();
        self.users.write().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|existing| existing.email.as_str() == user.email.as_str())
        {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }
}
