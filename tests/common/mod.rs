#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use coursedesk::db::{self, Storage};
use coursedesk::router::{DeskState, desk_router};
use coursedesk::session;
use serde_json::Value;
use tower::ServiceExt;

/// One application instance over a throwaway SQLite file, plus a cookie
/// store so a test can act as a logged-in browser session.
pub struct TestApp {
    pub app: Router,
    pub storage: Storage,
    db_path: PathBuf,
    cookies: HashMap<String, String>,
}

impl TestApp {
    pub async fn spawn() -> TestApp {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "coursedesk-test-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));

        let database_url = format!("sqlite:{}", db_path.display());
        let pool = db::connect(&database_url)
            .await
            .expect("failed to open test database");
        let storage = Storage::new(pool);
        storage.init_schema().await.expect("failed to init schema");

        let key = session::cookie_key("test-secret");
        let state = DeskState::new(storage.clone(), key, true);
        let app = desk_router(state);

        TestApp {
            app,
            storage,
            db_path,
            cookies: HashMap::new(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        self.request("GET", uri, None).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).expect("failed to encode form");
        self.request("POST", uri, Some(body)).await
    }

    /// Forget all cookies, i.e. switch to a fresh anonymous browser.
    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn register(&mut self, username: &str, password: &str, role: &str) {
        let resp = self
            .post_form(
                "/register",
                &[
                    ("username", username),
                    ("password", password),
                    ("role", role),
                ],
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    pub async fn login(&mut self, username: &str, password: &str) {
        let resp = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/dashboard");
    }

    async fn request(
        &mut self,
        method: &str,
        uri: &str,
        form_body: Option<String>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie_header = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie_header);
        }
        let body = match form_body {
            Some(data) => {
                builder =
                    builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(data)
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");
        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        self.absorb_cookies(&resp);
        resp
    }

    fn absorb_cookies(&mut self, resp: &Response<Body>) {
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else { continue };
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            // An empty value is a removal cookie.
            if value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_path);
    }
}

pub fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}
