//! Common test utilities for in-process router testing.
//!
//! This module provides a test fixture that builds the catalog router over a
//! temporary SQLite database, so requests can be driven through
//! `tower::ServiceExt::oneshot` without binding a port.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use spotlist_core::{Spot, SpotCatalog, SqliteSpotCatalog};

/// Test fixture for driving the catalog router in-process.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_spot() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post_form("/add", &[("name", "West Lake")]).await;
///
///     assert_eq!(response.status, StatusCode::FOUND);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Direct handle on the catalog behind the router
    pub catalog: Arc<SqliteSpotCatalog>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl TestResponse {
    /// True for the post/redirect/get answer that sends the browser home.
    pub fn is_redirect_home(&self) -> bool {
        self.status == StatusCode::FOUND && self.location.as_deref() == Some("/")
    }
}

impl TestFixture {
    /// Create a fixture over an empty catalog.
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// Create a fixture over a catalog holding the two seed spots.
    pub async fn seeded() -> Self {
        Self::build(true).await
    }

    async fn build(seed: bool) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let catalog =
            Arc::new(SqliteSpotCatalog::new(&db_path).expect("Failed to create catalog"));
        catalog.initialize(seed).expect("Failed to initialize catalog");

        let shared: Arc<dyn SpotCatalog> = catalog.clone();
        let state = Arc::new(spotlist_server::state::AppState::new(shared));
        let router = spotlist_server::api::create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    /// Current listing straight from the catalog.
    pub fn spots(&self) -> Vec<Spot> {
        self.catalog.list().expect("Failed to list spots")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with a url-encoded form body.
    ///
    /// Pairs are sent in order, so a key may repeat.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with an empty form body (button-only forms).
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.post_form(path, &[]).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let location = header_value(header::LOCATION);
        let content_type = header_value(header::CONTENT_TYPE);

        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            location,
            content_type,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.body
        );
    };
}
