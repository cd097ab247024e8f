use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use knowledge_cache::media::MediaStore;
use knowledge_cache::server::{AppState, create_router};
use knowledge_cache::store::{SqliteStore, Store};

/// An in-process server instance backed by a scratch database. Requests go
/// straight through the router without binding a socket.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<SqliteStore>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");

        let store = Arc::new(
            SqliteStore::new(temp_dir.path().join("test.db")).expect("failed to open store"),
        );
        store.initialize().expect("failed to initialize store");

        let state = Arc::new(AppState {
            store: store.clone(),
            media: MediaStore::new(temp_dir.path()),
        });

        Self {
            router: create_router(state),
            store,
            _temp_dir: temp_dir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Like `request` but returns the raw body, for non-JSON endpoints.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
    ) -> (StatusCode, Option<String>, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::empty()).expect("failed to build request"))
            .await
            .expect("request failed");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes()
            .to_vec();

        (status, content_type, bytes)
    }

    /// Creates an account and returns (token, user_id).
    pub async fn signup(&self, email: &str, name: &str) -> (String, String) {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/auth/signup",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "name": name,
                    "password": "hunter2"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");

        let token = body["data"]["token"].as_str().expect("no token").to_string();
        let user_id = body["data"]["user"]["id"]
            .as_str()
            .expect("no user id")
            .to_string();
        (token, user_id)
    }

    /// Creates a set and returns its id.
    pub async fn create_set(&self, token: &str, title: &str, is_public: bool) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/sets",
                Some(token),
                Some(serde_json::json!({
                    "title": title,
                    "is_public": is_public
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create set failed: {body}");
        body["data"]["id"].as_str().expect("no set id").to_string()
    }
}
