//! Common test utilities for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reconciler_core::{Config, FilterConfig, InMemoryResultCache, ResultCache};
use reconciler_server::state::AppState;

/// Re-export fixtures for test convenience
pub use reconciler_core::testing::fixtures;

/// In-process server with an inspectable result cache.
pub struct TestFixture {
    pub router: Router,
    /// Backing cache, `None` when the fixture runs with caching disabled
    pub cache: Option<Arc<InMemoryResultCache>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with no quality exclusions and an in-memory cache.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(test_config: TestConfig) -> Self {
        let config = Config {
            filter: FilterConfig {
                exclusion: test_config.exclusion,
            },
            ..Config::default()
        };

        let cache = test_config
            .enable_cache
            .then(|| Arc::new(InMemoryResultCache::new()));
        let shared = cache
            .as_ref()
            .map(|c| Arc::clone(c) as Arc<dyn ResultCache>);

        let state = Arc::new(AppState::new(config, shared));
        let router = reconciler_server::api::create_router(state);

        Self { router, cache }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub exclusion: Vec<String>,
    pub enable_cache: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            exclusion: Vec::new(),
            enable_cache: true,
        }
    }
}

impl TestConfig {
    pub fn excluding(tokens: &[&str]) -> Self {
        Self {
            exclusion: tokens.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn without_cache() -> Self {
        Self {
            enable_cache: false,
            ..Self::default()
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
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
