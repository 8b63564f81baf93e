//! Test utilities and common setup.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use blog::account::AccountService;
use blog::api::{self, AppState};
use blog::auth::{AuthState, PasswordHasher, PasswordPolicy, TokenIssuer};
use blog::db::Database;
use blog::user::UserRepository;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Router plus handles for arranging state directly.
pub struct TestApp {
    pub router: Router,
    pub users: UserRepository,
    pub issuer: Arc<TokenIssuer>,
    _dir: Option<TempDir>,
}

/// Create a test application backed by an in-memory database.
pub async fn test_app() -> TestApp {
    test_app_with_origins(Vec::new()).await
}

pub async fn test_app_with_origins(allowed_origins: Vec<String>) -> TestApp {
    let db = Database::in_memory().await.unwrap();
    build_app(db, allowed_origins, None)
}

/// Create a test application on a WAL database file with a full pool.
pub async fn test_app_on_disk() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(&dir.path().join("blog.db")).await.unwrap();
    build_app(db, Vec::new(), Some(dir))
}

fn build_app(db: Database, allowed_origins: Vec<String>, dir: Option<TempDir>) -> TestApp {
    let users = UserRepository::new(db.pool().clone());
    let issuer = Arc::new(TokenIssuer::new(TEST_SECRET, Duration::from_secs(3600)).unwrap());

    // Lowest bcrypt cost keeps the suite fast.
    let accounts = AccountService::new(
        users.clone(),
        PasswordHasher::new(4),
        issuer.clone(),
        PasswordPolicy::default(),
    )
    .without_notifier();

    let state = AppState::new(accounts, AuthState::new(issuer.clone()), allowed_origins);

    TestApp {
        router: api::create_router(state),
        users,
        issuer,
        _dir: dir,
    }
}

impl TestApp {
    /// Send a request and decode the JSON response body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Register an account and return its generated password.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, json) = self
            .send(
                Method::POST,
                "/v1/accounts",
                Some(serde_json::json!({ "name": name, "email": email })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {json}");
        json["data"]["password"].as_str().unwrap().to_string()
    }

    /// Log in and return the issued token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, json) = self
            .send(
                Method::POST,
                "/v1/accounts/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {json}");
        json["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn user_id(&self, email: &str) -> i64 {
        self.users
            .find_by_email_with_roles(email)
            .await
            .unwrap()
            .unwrap()
            .id
    }
}
