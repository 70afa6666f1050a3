//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use activity_api::server::seed_admin;
use activity_api::{create_app, create_app_state};
use activity_common::{AdminSeedConfig, AppConfig};
use anyhow::Result;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{unique_suffix, AuthResponse, CreateUserRequest, LoginRequest, UserResponse};

/// Password given to every account the tests create
pub const TEST_PASSWORD: &str = "Passw0rd-for-tests";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Bootstrap admin of this server instance
    pub admin: AdminSeedConfig,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose bootstrap admin is unique to this test
    pub async fn start() -> Result<Self> {
        let mut config = test_config()?;
        config.admin = AdminSeedConfig {
            email: format!("admin{}@sahelys.bf", unique_suffix()),
            name: "Administrateur Test".to_string(),
            password: Some(TEST_PASSWORD.to_string()),
        };
        Self::start_with_config(config).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let admin = config.admin.clone();

        let state = create_app_state(config).await?;
        seed_admin(&state).await?;
        let app = create_app(state)?;

        // Port 0: the OS picks a free one
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            admin,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/api/v1{}", self.base_url(), path);
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET outside `/api/v1`
    pub async fn get_root(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(url).send().await?)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(self.request(Method::GET, path, token).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, token: Option<&str>, body: &T) -> Result<Response> {
        Ok(self.request(Method::POST, path, token).json(body).send().await?)
    }

    pub async fn put<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        Ok(self.request(Method::PUT, path, Some(token)).json(body).send().await?)
    }

    pub async fn patch(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::PATCH, path, Some(token)).send().await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.request(Method::DELETE, path, Some(token)).send().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let response = self
            .post("/auth/login", None, &LoginRequest::new(email, password))
            .await?;
        assert_json(response, StatusCode::OK).await
    }

    /// Access token of the bootstrap admin
    pub async fn admin_token(&self) -> Result<String> {
        Ok(self.login(&self.admin.email, TEST_PASSWORD).await?.token)
    }

    /// Create a fresh employee through the API and log in as them
    pub async fn new_employee(&self, admin_token: &str) -> Result<(UserResponse, String)> {
        let request = CreateUserRequest::employee();
        let response = self.post("/users", Some(admin_token), &request).await?;
        let user: UserResponse = assert_json(response, StatusCode::CREATED).await?;
        let auth = self.login(&request.email, &request.password).await?;
        Ok((user, auth.token))
    }
}

/// Configuration from the environment (and `.env`)
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// The suite needs a database and a signing secret; without them it is skipped
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    for var in ["DATABASE_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert status and the `error.code` of an API error body
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<()> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    let code = body["error"]["code"].as_str().unwrap_or_default();
    anyhow::ensure!(code == expected_code, "Expected error code {expected_code}, got {body}");
    Ok(())
}
