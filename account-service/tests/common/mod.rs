use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::credential::errors::AccountError;
use account_service::credential::models::Credential;
use account_service::credential::models::EmailAddress;
use account_service::credential::ports::CredentialStore;
use account_service::credential::service::AuthService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const JWT_ISSUER: &str = "appid";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryCredentialStore>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application backed by an in-memory store
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryCredentialStore::default());
        Self::spawn_with_store(store).await
    }

    /// Spawn the application with a store that is always unreachable
    pub async fn spawn_unavailable() -> (String, reqwest::Client) {
        let address = spawn_router(Arc::new(UnavailableCredentialStore)).await;
        (address, reqwest::Client::new())
    }

    async fn spawn_with_store(store: Arc<InMemoryCredentialStore>) -> Self {
        let address = spawn_router(Arc::clone(&store)).await;

        Self {
            address,
            store,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET, JWT_ISSUER),
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

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Sign up and return the response status
    pub async fn signup(&self, role: &str, email: &str, password: &str) -> reqwest::StatusCode {
        self.post(&format!("/api/auth/signup/{}", role))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .status()
    }

    /// Log in and return the issued token
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}

async fn spawn_router<CS: CredentialStore>(store: Arc<CS>) -> String {
    // Use random port (0 = OS assigns)
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Lowest accepted work factor keeps the suite fast
    let password_hasher = PasswordHasher::with_rounds(PasswordHasher::MIN_ROUNDS)
        .expect("Failed to build password hasher");
    let authenticator = Arc::new(Authenticator::from_parts(
        password_hasher,
        JwtHandler::new(JWT_SECRET, JWT_ISSUER),
    ));

    let auth_service = Arc::new(AuthService::new(store, Arc::clone(&authenticator), 1));
    let router = create_router(auth_service, authenticator);

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    address
}

/// Credential store keyed by email, enforcing uniqueness like the database constraint.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    pub fn len(&self) -> usize {
        self.credentials.lock().unwrap().len()
    }

    pub fn get(&self, email: &str) -> Option<Credential> {
        self.credentials.lock().unwrap().get(email).cloned()
    }

    /// Seed a record directly, bypassing signup
    pub fn seed(&self, credential: Credential) {
        self.credentials
            .lock()
            .unwrap()
            .insert(credential.email.as_str().to_string(), credential);
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Credential>, AccountError> {
        Ok(self.get(email.as_str()))
    }

    async fn insert(&self, credential: Credential) -> Result<Credential, AccountError> {
        let mut credentials = self.credentials.lock().unwrap();
        let key = credential.email.as_str().to_string();

        if credentials.contains_key(&key) {
            return Err(AccountError::EmailAlreadyExists(key));
        }

        credentials.insert(key, credential.clone());
        Ok(credential)
    }
}

pub struct UnavailableCredentialStore;

#[async_trait]
impl CredentialStore for UnavailableCredentialStore {
    async fn find_by_email(&self, _email: &EmailAddress) -> Result<Option<Credential>, AccountError> {
        Err(AccountError::StoreUnavailable("connection refused".into()))
    }

    async fn insert(&self, _credential: Credential) -> Result<Credential, AccountError> {
        Err(AccountError::StoreUnavailable("connection refused".into()))
    }
}
