//! Shared test harness
//!
//! Spins up the full router against a throwaway RocksDB database and
//! drives it in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use storekeep_server::auth::{JwtConfig, JwtService};
use storekeep_server::core::{Config, ServerState, router};

pub struct TestApp {
    pub router: Router,
    pub state: ServerState,
    _tmp: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the refreshToken cookie set by this response, if any
    pub fn refresh_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("refreshToken="))
            .map(|v| {
                v.trim_start_matches("refreshToken=")
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .to_string()
            })
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
        config.jwt = JwtConfig {
            secret: "integration-test-secret-0123456789abcdef".to_string(),
            expiration_minutes: 30,
            issuer: "storekeep-server".to_string(),
            audience: "storekeep-admin".to_string(),
        };
        config
            .ensure_work_dir_structure()
            .expect("work dir structure");

        let db_path = config.database_dir().join("storekeep.db");
        let db = storekeep_server::db::DbService::new(&db_path)
            .await
            .expect("database")
            .db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let state = ServerState::new(config, db, jwt_service);

        Self {
            router: router(state.clone()),
            state,
            _tmp: tmp,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, format!("refreshToken={cookie}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register a user with default test profile fields
    pub async fn signup(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/signup",
            None,
            None,
            Some(json!({
                "username": username,
                "password": password,
                "email": format!("{username}@example.com"),
                "firstName": "Test",
                "lastName": "User",
            })),
        )
        .await
    }

    /// Sign in, returning (access token, refresh cookie value)
    pub async fn signin(&self, username: &str, password: &str) -> (String, String) {
        let res = self
            .request(
                "POST",
                "/api/auth/signin",
                None,
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "signin failed: {:?}", res.body);
        let token = res.body["accessToken"].as_str().expect("token").to_string();
        let cookie = res.refresh_cookie().expect("refresh cookie");
        (token, cookie)
    }

    /// Signup + signin in one step, returning the access token
    pub async fn authed_user(&self, username: &str) -> String {
        let res = self.signup(username, "p4ssw0rd-test").await;
        assert_eq!(res.status, StatusCode::CREATED, "signup: {:?}", res.body);
        self.signin(username, "p4ssw0rd-test").await.0
    }

    /// Create a product for the token's user, returning its id
    pub async fn create_product(
        &self,
        token: &str,
        name: &str,
        price: f64,
        stock: i64,
    ) -> String {
        let res = self
            .request(
                "POST",
                "/api/products",
                Some(token),
                None,
                Some(json!({
                    "name": name,
                    "price": price,
                    "stock": stock,
                    "image": "https://img.example.com/p.png",
                })),
            )
            .await;
        assert_eq!(
            res.status,
            StatusCode::CREATED,
            "create product: {:?}",
            res.body
        );
        res.body["id"].as_str().expect("product id").to_string()
    }
}
