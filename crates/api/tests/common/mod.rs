#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wishly_api::auth::jwt::{issue_token, JwtConfig};
use wishly_api::config::{LogFormat, ServerConfig};
use wishly_api::router::build_app_router;
use wishly_api::state::AppState;
use wishly_core::reservation::NameMatchPolicy;
use wishly_core::types::DbId;
use wishly_db::models::user::{CreateUser, User};
use wishly_db::store::{MemoryStore, Store};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        db_max_connections: 1,
        unreserve_match: NameMatchPolicy::Exact,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "wishly-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The full application router over an in-memory store, plus handles for
/// seeding data and minting tokens.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub config: ServerConfig,
}

/// Build the application exactly as `main.rs` does, backed by a fresh
/// [`MemoryStore`].
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn Store> = store.clone();
    let router = build_app_router(AppState::new(shared, config.clone()));
    TestApp {
        router,
        store,
        config,
    }
}

impl TestApp {
    pub async fn seed_user(&self, email: &str, name: &str) -> User {
        self.store
            .create_user(&CreateUser {
                email: email.to_string(),
                name: name.to_string(),
                is_admin: false,
            })
            .await
            .unwrap()
    }

    pub fn token_for(&self, user_id: DbId) -> String {
        issue_token(user_id, "user", &self.config.jwt).unwrap()
    }

    /// Seed a user and return them with a valid bearer token.
    pub async fn login(&self, email: &str, name: &str) -> (User, String) {
        let user = self.seed_user(email, name).await;
        let token = self.token_for(user.id);
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
        self.send(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        self.send(request(Method::DELETE, uri, token, None)).await
    }

    /// Create a wishlist through the API and return its JSON.
    pub async fn create_wishlist(&self, token: &str, title: &str, is_public: bool) -> Value {
        let response = self
            .post(
                "/api/wishlists",
                Some(token),
                serde_json::json!({ "title": title, "is_public": is_public }),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        body_json(response).await
    }

    /// Add an item through the API and return its JSON.
    pub async fn add_item(&self, token: &str, wishlist_id: i64, name: &str) -> Value {
        let response = self
            .post(
                &format!("/api/wishlists/{wishlist_id}/items"),
                Some(token),
                serde_json::json!({ "name": name, "price": 25000, "currency": "ngn" }),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        body_json(response).await
    }
}

/// Build a request with an optional bearer token and JSON body.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
