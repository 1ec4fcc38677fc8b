//! Shared mock REST backend for the client integration tests.
//!
//! Serves the fixed backend's routes on an ephemeral port and records every
//! request (method, path, raw query, authorization header, JSON body) so
//! tests can assert on exactly what went over the wire. Refresh-endpoint
//! hits are counted separately and never appear in the recorded requests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;

/// Behavior knobs for one mock server instance.
#[derive(Clone)]
pub struct MockOptions {
    /// Value of the `x-total-count` header on list responses; `None` omits it.
    pub total_header: Option<String>,
    /// When set, data routes answer 401 unless the bearer token matches.
    pub require_token: Option<String>,
    /// Token handed out by the refresh endpoint.
    pub refresh_token_value: String,
    /// Make the refresh endpoint fail with a 500.
    pub refresh_fails: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            total_header: Some("25".to_string()),
            require_token: None,
            refresh_token_value: "fresh-token".to_string(),
            refresh_fails: false,
        }
    }
}

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct MockState {
    options: MockOptions,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    refresh_calls: Arc<AtomicUsize>,
}

/// Handle onto a running mock backend.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    refresh_calls: Arc<AtomicUsize>,
}

impl MockServer {
    /// Bind an ephemeral port and serve the mock routes on it.
    pub async fn spawn(options: MockOptions) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let refresh_calls = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            options,
            requests: Arc::clone(&requests),
            refresh_calls: Arc::clone(&refresh_calls),
        };

        let app = Router::new().fallback(handle).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            refresh_calls,
        }
    }

    /// All recorded data requests, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Number of recorded data requests.
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    /// The most recent data request.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .expect("requests lock")
            .last()
            .expect("at least one request recorded")
            .clone()
    }

    /// Number of refresh-endpoint hits.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();

    if path == "/auth/token/refresh" {
        state.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if state.options.refresh_fails {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "refresh backend down" })),
            )
                .into_response();
        }
        return Json(json!({ "token": state.options.refresh_token_value })).into_response();
    }

    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method: method.to_string(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            authorization: authorization.clone(),
            body: if body.is_empty() {
                None
            } else {
                serde_json::from_slice(&body).ok()
            },
        });

    if let Some(required) = &state.options.require_token {
        let expected = format!("Bearer {required}");
        if authorization.as_deref() != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "token expired" })),
            )
                .into_response();
        }
    }

    route(&state.options, &path)
}

/// Canned responses per route.
fn route(options: &MockOptions, path: &str) -> Response {
    match path {
        "/blog_posts" => {
            let posts = json!([
                { "id": 1, "title": "Hello", "status": "published" },
                { "id": 2, "title": "World", "status": "published" },
            ]);
            match &options.total_header {
                Some(total) => (
                    StatusCode::OK,
                    [("x-total-count", total.clone())],
                    Json(posts),
                )
                    .into_response(),
                None => Json(posts).into_response(),
            }
        }
        "/blog_posts/bulk" => Json(json!([{ "id": 1 }, { "id": 2 }])).into_response(),
        p if p.starts_with("/blog_posts/") => {
            Json(json!({ "id": 7, "title": "One", "status": "draft" })).into_response()
        }
        "/status" => Json(json!({ "ok": true })).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "not found" })),
        )
            .into_response(),
    }
}
