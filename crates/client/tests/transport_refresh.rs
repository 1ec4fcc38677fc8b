//! Integration tests for bearer injection and the refresh interceptor.

mod support;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;

use pressroom_client::{ClientError, HttpTransport, RestDataProvider};
use pressroom_core::provider::{DataProvider, SessionStore};
use pressroom_core::session::Session;
use pressroom_session::MemorySessionStore;

use support::{MockOptions, MockServer};

fn stack_for(
    server: &MockServer,
    session: Option<Session>,
) -> (RestDataProvider, Arc<MemorySessionStore>) {
    let store = Arc::new(match session {
        Some(session) => MemorySessionStore::with_session(session),
        None => MemorySessionStore::new(),
    });
    let transport = Arc::new(
        HttpTransport::new(
            &server.base_url,
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Duration::from_secs(5),
        )
        .expect("transport builds"),
    );
    (RestDataProvider::new(transport), store)
}

fn session_with_token(token: &str) -> Session {
    Session::new("apip@mail.com", None, Some(token.to_string()))
}

// ---------------------------------------------------------------------------
// Bearer injection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_is_read_from_the_store_at_send_time() {
    let server = MockServer::spawn(MockOptions::default()).await;
    let (provider, store) = stack_for(&server, Some(session_with_token("alpha")));

    provider.get_one("blog_posts", "1").await.unwrap();
    assert_eq!(
        server.last_request().authorization.as_deref(),
        Some("Bearer alpha")
    );

    // Swapping the stored token is picked up by the very next request,
    // without rebuilding the transport.
    store.update_token(Some("beta".to_string())).await.unwrap();
    provider.get_one("blog_posts", "1").await.unwrap();
    assert_eq!(
        server.last_request().authorization.as_deref(),
        Some("Bearer beta")
    );
}

#[tokio::test]
async fn no_session_means_no_authorization_header() {
    let server = MockServer::spawn(MockOptions::default()).await;
    let (provider, _) = stack_for(&server, None);

    provider.get_one("blog_posts", "1").await.unwrap();
    assert_eq!(server.last_request().authorization, None);
}

// ---------------------------------------------------------------------------
// Refresh interceptor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_401_triggers_one_refresh_and_one_retry() {
    let server = MockServer::spawn(MockOptions {
        require_token: Some("fresh-token".to_string()),
        ..MockOptions::default()
    })
    .await;
    let (provider, store) = stack_for(&server, Some(session_with_token("stale")));

    provider.get_one("blog_posts", "1").await.unwrap();

    assert_eq!(server.refresh_calls(), 1);
    let requests = server.requests();
    assert_eq!(requests.len(), 2, "original request plus exactly one retry");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer stale"));
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some("Bearer fresh-token")
    );

    // The refreshed token was persisted for subsequent requests.
    let session = store.get().await.unwrap().expect("session kept");
    assert_eq!(session.token.as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn refresh_failure_propagates_the_original_error() {
    let server = MockServer::spawn(MockOptions {
        require_token: Some("good".to_string()),
        refresh_fails: true,
        ..MockOptions::default()
    })
    .await;
    let (provider, store) = stack_for(&server, Some(session_with_token("stale")));

    let error = provider
        .get_one("blog_posts", "1")
        .await
        .expect_err("must fail when refresh fails");

    // The caller sees the original 401, not the refresh endpoint's 500.
    assert_matches!(
        error,
        ClientError::Api { status: 401, ref message } if message == "token expired"
    );
    assert_eq!(server.refresh_calls(), 1);
    assert_eq!(server.request_count(), 1, "no retry without a new token");

    // The stale token is untouched.
    let session = store.get().await.unwrap().unwrap();
    assert_eq!(session.token.as_deref(), Some("stale"));
}

#[tokio::test]
async fn retry_is_attempted_at_most_once() {
    // The refresh hands out a token the backend still rejects, so the retry
    // fails too. That second failure must be final -- no refresh loop.
    let server = MockServer::spawn(MockOptions {
        require_token: Some("never-issued".to_string()),
        ..MockOptions::default()
    })
    .await;
    let (provider, _) = stack_for(&server, Some(session_with_token("stale")));

    let error = provider
        .get_one("blog_posts", "1")
        .await
        .expect_err("retry with a still-bad token must fail");

    assert_matches!(error, ClientError::Api { status: 401, .. });
    assert_eq!(server.refresh_calls(), 1, "exactly one refresh attempt");
    assert_eq!(server.request_count(), 2, "original plus one retry");
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
    let server = MockServer::spawn(MockOptions {
        require_token: Some("fresh-token".to_string()),
        ..MockOptions::default()
    })
    .await;
    let (provider, _) = stack_for(&server, Some(session_with_token("stale")));

    let (a, b) = futures::future::join(
        provider.get_one("blog_posts", "1"),
        provider.get_one("blog_posts", "2"),
    )
    .await;
    a.expect("first concurrent call succeeds");
    b.expect("second concurrent call succeeds");

    assert_eq!(
        server.refresh_calls(),
        1,
        "concurrent failures must share one refresh"
    );
}

#[tokio::test]
async fn refresh_without_a_session_still_serves_the_retry() {
    // No session record exists, so the refreshed token cannot be persisted;
    // it must still carry the in-flight retry.
    let server = MockServer::spawn(MockOptions {
        require_token: Some("fresh-token".to_string()),
        ..MockOptions::default()
    })
    .await;
    let (provider, store) = stack_for(&server, None);

    provider.get_one("blog_posts", "1").await.unwrap();

    assert_eq!(server.refresh_calls(), 1);
    let requests = server.requests();
    assert_eq!(requests[0].authorization, None);
    assert_eq!(
        requests[1].authorization.as_deref(),
        Some("Bearer fresh-token")
    );
    assert_eq!(store.get().await.unwrap(), None, "nothing was persisted");
}
