//! Shared harness: the full router over an in-memory store.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chirpy_api::config::ApiConfig;
use chirpy_api::{AppState, router};
use chirpy_core::store::MemoryStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TOKEN_SECRET: &str = "integration-test-secret";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _files: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_platform("prod")
    }

    pub fn with_platform(platform: &str) -> Self {
        let files = tempfile::tempdir().expect("tempdir");
        std::fs::write(files.path().join("index.html"), "<h1>Chirpy</h1>").expect("index.html");

        let vars: HashMap<&str, String> = HashMap::from([
            ("TOKEN_SECRET", TOKEN_SECRET.to_string()),
            ("POLKA_KEY", POLKA_KEY.to_string()),
            ("PLATFORM", platform.to_string()),
            ("BCRYPT_COST", "4".to_string()),
            ("FILEPATH_ROOT", files.path().display().to_string()),
        ]);
        let config = ApiConfig::from_lookup(|key| vars.get(key).cloned()).expect("config");

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        Self {
            router: router(state.clone()),
            state,
            _files: files,
        }
    }

    /// Send a request and return the status with the raw body text.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8 body"))
    }

    /// Like [`TestApp::send`], parsing the body as JSON (`Null` when empty).
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, text) = self.send(method, uri, authorization, body).await;
        let json = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("JSON body")
        };
        (status, json)
    }

    pub async fn register(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/users",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
        body
    }

    pub async fn login(&self, email: &str, password: &str) -> Value {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login {email}: {body}");
        body
    }
}

pub fn bearer(token: &Value) -> String {
    format!("Bearer {}", token.as_str().expect("token string"))
}
