#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use wah::config::Config;
use wah::state::AppState;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin-test-pass";

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        secret_key: "test secret key".to_string(),
        cookie_secure: false,
        admin_user: ADMIN_USER.to_string(),
        admin_pass: ADMIN_PASS.to_string(),
        admin_mail: "admin@example.org".to_string(),
        log_file: None,
    }
}

/// Fresh in-memory database, migrated and seeded
///
/// A single connection that never expires: every connection to
/// `sqlite::memory:` would otherwise see its own empty database.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");

    AppState::with_pool(pool, test_config())
        .await
        .expect("migrations and seeding")
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = test_state().await;
        let router = wah::app(state.clone(), MemoryStore::default());
        TestApp { state, router }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Log in and return the session cookie to send with later requests
    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .post_form("/login", &format!("username={}&password={}", username, password), None)
            .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "login should redirect");
        session_cookie(&res).expect("login sets the session cookie")
    }
}

/// `name=value` part of the Set-Cookie header, if any
pub fn session_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub fn location(res: &Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_text(res: Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
