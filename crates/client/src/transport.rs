//! Request execution with bearer injection and one-shot token refresh.
//!
//! Every outgoing request reads the current token from the session store at
//! send time, so a refreshed token is picked up by the very next request
//! without rebuilding the transport. On a 401/403 response the transport
//! performs at most one refresh round trip against the fixed refresh
//! endpoint and re-issues the original request once; refreshes are
//! serialized per transport instance, so concurrent failures share a single
//! refresh call.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Response};
use serde::Deserialize;
use tokio::sync::Mutex;

use pressroom_core::provider::{HttpMethod, SessionStore};

use crate::error::ClientError;

/// Path of the token refresh endpoint below the API base URL.
const REFRESH_PATH: &str = "/auth/token/refresh";

/// Body of a successful refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
}

/// A rebuildable request description.
///
/// Kept as plain data so the refresh interceptor can re-issue an identical
/// request after swapping the bearer token.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL without query parameters.
    pub url: String,
    /// Query parameters, URL-encoded at send time.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Extra headers beyond `Authorization`.
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    /// A bare request with no query, body, or extra headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }
}

/// HTTP executor shared by the data provider and any custom callers.
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    refresh_url: String,
    store: Arc<dyn SessionStore>,
    /// Serializes refreshes; concurrent 401s queue here instead of each
    /// re-authenticating on its own.
    refresh_gate: Mutex<()>,
}

impl HttpTransport {
    /// Build a transport against `api_url` with the given request timeout.
    ///
    /// The timeout doubles as the cancellation bound: an abandoned call
    /// fails observably instead of hanging forever.
    pub fn new(
        api_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let refresh_url = format!("{api_url}{REFRESH_PATH}");
        Ok(Self {
            client,
            api_url,
            refresh_url,
            store,
            refresh_gate: Mutex::new(()),
        })
    }

    /// The configured base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Execute a request, refreshing the token once on a 401/403.
    ///
    /// Non-success responses are normalized to
    /// [`ClientError::Api`]; on refresh failure the ORIGINAL authorization
    /// error propagates, never the refresh endpoint's.
    pub async fn send(&self, spec: &RequestSpec) -> Result<Response, ClientError> {
        let token = self.current_token().await?;
        let response = self.dispatch(spec, token.as_deref()).await?;

        if !matches!(response.status().as_u16(), 401 | 403) {
            return Self::ensure_success(response).await;
        }

        let original = Self::error_from(response).await;
        match self.refresh_token(token.as_deref()).await {
            Ok(fresh) => {
                let retried = self.dispatch(spec, Some(&fresh)).await?;
                // One retry only: a second authorization failure is final.
                Self::ensure_success(retried).await
            }
            Err(refresh_error) => {
                tracing::warn!(
                    error = %refresh_error,
                    "Token refresh failed, propagating original error"
                );
                Err(original)
            }
        }
    }

    /// GET `url`.
    pub async fn get(&self, url: &str) -> Result<Response, ClientError> {
        self.send(&RequestSpec::new(Method::GET, url)).await
    }

    /// POST `url` with an optional JSON body.
    pub async fn post(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let mut spec = RequestSpec::new(Method::POST, url);
        spec.body = body;
        self.send(&spec).await
    }

    /// PATCH `url` with an optional JSON body.
    pub async fn patch(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let mut spec = RequestSpec::new(Method::PATCH, url);
        spec.body = body;
        self.send(&spec).await
    }

    /// PUT `url` with an optional JSON body.
    pub async fn put(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let mut spec = RequestSpec::new(Method::PUT, url);
        spec.body = body;
        self.send(&spec).await
    }

    /// DELETE `url` with an optional JSON body.
    pub async fn delete(
        &self,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let mut spec = RequestSpec::new(Method::DELETE, url);
        spec.body = body;
        self.send(&spec).await
    }

    // ---- private helpers ----

    /// Current bearer token, read fresh from the store.
    async fn current_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self.store.get().await?.and_then(|session| session.token))
    }

    /// Build and send one request with the given token attached.
    async fn dispatch(
        &self,
        spec: &RequestSpec,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut request = self.client.request(spec.method.clone(), &spec.url);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        for (name, value) in &spec.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Refresh the bearer token, at most once across concurrent callers.
    ///
    /// `used` is the token the failed request carried. If the stored token
    /// already differs when the gate is acquired, another caller refreshed
    /// in the meantime and that token is returned without a second round
    /// trip.
    async fn refresh_token(&self, used: Option<&str>) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.current_token().await? {
            if used != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let response = self.client.post(&self.refresh_url).send().await?;
        let response = Self::ensure_success(response).await?;
        let refreshed: RefreshResponse = response.json().await?;

        // Persist so the very next request picks the new token up. Without
        // a session record the token still serves the in-flight retry.
        self.store
            .update_token(Some(refreshed.token.clone()))
            .await?;
        tracing::debug!("Bearer token refreshed");
        Ok(refreshed.token)
    }

    /// Pass through success responses, normalize everything else.
    async fn ensure_success(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(Self::error_from(response).await)
    }

    /// Normalize a failed response into [`ClientError::Api`].
    ///
    /// The message comes from the body's `message` field when the body is
    /// JSON, else the raw body, else the status reason.
    async fn error_from(response: Response) -> ClientError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("HTTP error").to_string()
                } else {
                    body
                }
            });

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Map the provider-level method enum onto the wire method.
pub(crate) fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}
