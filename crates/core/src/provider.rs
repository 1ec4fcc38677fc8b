//! Provider and store trait seams plus the auth outcome types.
//!
//! Auth operations report success or failure as data with an optional
//! redirect hint: a rejected login is an outcome the UI flow acts on, not an
//! `Err`. Only infrastructure failures (storage, transport) surface as
//! errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{HttpError, StoreError};
use crate::query::{FilterClause, Pagination, Sorter};
use crate::session::{Identity, Session};
use crate::types::{ListResult, Record};

/// Route callers are redirected to after a successful login.
pub const ROOT_ROUTE: &str = "/";

/// Route callers are redirected to when a session is required or ends.
pub const LOGIN_ROUTE: &str = "/login";

// ---------------------------------------------------------------------------
// Auth outcome types
// ---------------------------------------------------------------------------

/// Fixed name/message pair describing an authentication failure.
///
/// Messages are deliberately non-specific: a failed login never reveals
/// which of email or password was wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailure {
    /// Short failure category.
    pub name: String,
    /// Fixed human-readable message.
    pub message: String,
}

impl AuthFailure {
    /// The one message every failed login gets.
    pub fn invalid_credentials() -> Self {
        Self {
            name: "Login Error".to_string(),
            message: "Invalid email or password".to_string(),
        }
    }

    /// Raised when an operation requires a session and none exists.
    pub fn unauthorized() -> Self {
        Self {
            name: "Check Error".to_string(),
            message: "Unauthorized".to_string(),
        }
    }

    /// Raised when registering an email the directory already holds.
    pub fn user_exists() -> Self {
        Self {
            name: "Register Error".to_string(),
            message: "User already exists".to_string(),
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Whether a session was established.
    pub authenticated: bool,
    /// Where the navigation collaborator should send the user.
    pub redirect_to: Option<String>,
    /// Present iff the attempt failed.
    pub error: Option<AuthFailure>,
}

impl LoginOutcome {
    /// Successful login, redirecting to the app root.
    pub fn success() -> Self {
        Self {
            authenticated: true,
            redirect_to: Some(ROOT_ROUTE.to_string()),
            error: None,
        }
    }

    /// Failed login with the fixed credentials error.
    pub fn failure() -> Self {
        Self {
            authenticated: false,
            redirect_to: None,
            error: Some(AuthFailure::invalid_credentials()),
        }
    }
}

/// Result of a session check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCheck {
    /// Whether a session currently exists.
    pub authenticated: bool,
    /// Whether the caller should clear client state and log out.
    pub force_logout: bool,
    /// Where to send the user when unauthenticated.
    pub redirect_to: Option<String>,
    /// Present iff the check failed.
    pub error: Option<AuthFailure>,
}

impl SessionCheck {
    /// A present, valid session.
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            force_logout: false,
            redirect_to: None,
            error: None,
        }
    }

    /// No session: request logout and a redirect to the login route.
    pub fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            force_logout: true,
            redirect_to: Some(LOGIN_ROUTE.to_string()),
            error: Some(AuthFailure::unauthorized()),
        }
    }
}

/// Result of a logout. Logout cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Always true.
    pub success: bool,
    /// Always the login route.
    pub redirect_to: String,
}

impl Default for LogoutOutcome {
    fn default() -> Self {
        Self {
            success: true,
            redirect_to: LOGIN_ROUTE.to_string(),
        }
    }
}

/// Result of registration and the password operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Where to send the user on success.
    pub redirect_to: Option<String>,
    /// Present iff the operation failed.
    pub error: Option<AuthFailure>,
}

impl AuthOutcome {
    /// Success with a redirect to the login route.
    pub fn success() -> Self {
        Self {
            success: true,
            redirect_to: Some(LOGIN_ROUTE.to_string()),
            error: None,
        }
    }

    /// Failure carrying the given fixed error.
    pub fn failure(error: AuthFailure) -> Self {
        Self {
            success: false,
            redirect_to: None,
            error: Some(error),
        }
    }
}

/// What the caller should do about a transport error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAction {
    /// Whether the session must be abandoned.
    pub logout: bool,
    /// Where to send the user when logging out.
    pub redirect_to: Option<String>,
}

impl ErrorAction {
    /// Forced logout with a redirect to the login route.
    pub fn force_logout() -> Self {
        Self {
            logout: true,
            redirect_to: Some(LOGIN_ROUTE.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Custom request descriptor
// ---------------------------------------------------------------------------

/// HTTP method for [`CustomRequest`] dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Escape-hatch request against an arbitrary URL.
///
/// Sorters and filters are serialized exactly as for a list request; the
/// free-form `query` pairs are appended after them.
#[derive(Debug, Clone, Default)]
pub struct CustomRequest {
    /// Absolute URL to call.
    pub url: String,
    /// Method to dispatch with; GET when unspecified.
    pub method: HttpMethod,
    /// Optional sort descriptors.
    pub sorters: Vec<Sorter>,
    /// Optional filter clauses.
    pub filters: Vec<FilterClause>,
    /// JSON body for PUT/POST/PATCH, or the DELETE body.
    pub payload: Option<Record>,
    /// Free-form query parameters appended verbatim.
    pub query: Vec<(String, serde_json::Value)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
}

impl CustomRequest {
    /// A GET request against `url` with no query or headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Trait seams
// ---------------------------------------------------------------------------

/// Durable storage for the single client session.
///
/// Implementations serialize read-modify-write internally so concurrent
/// callers cannot interleave between a read and the following write.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, or `None` when unauthenticated.
    async fn get(&self) -> Result<Option<Session>, StoreError>;

    /// Replace the stored session.
    async fn set(&self, session: Session) -> Result<(), StoreError>;

    /// Remove the stored session. Idempotent.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Replace only the bearer token, leaving identity fields untouched.
    ///
    /// A no-op when no session record exists; callers that need the token
    /// without a session keep it in memory for the request at hand.
    async fn update_token(&self, token: Option<String>) -> Result<(), StoreError>;
}

/// Authentication adapter: the session lifecycle as seen by the app shell.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Infrastructure error type of the concrete provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Attempt a login; persists a session on success.
    async fn login(&self, email: &str, password: Option<&str>)
        -> Result<LoginOutcome, Self::Error>;

    /// Is a session present right now?
    async fn check(&self) -> Result<SessionCheck, Self::Error>;

    /// Destroy the session unconditionally.
    async fn logout(&self) -> Result<LogoutOutcome, Self::Error>;

    /// Classify a transport failure into a follow-up action.
    fn on_error(&self, error: &HttpError) -> ErrorAction;

    /// Role names of the current session, or `None` without one.
    async fn permissions(&self) -> Result<Option<Vec<String>>, Self::Error>;

    /// Identity view of the current session, or `None` without one.
    async fn identity(&self) -> Result<Option<Identity>, Self::Error>;

    /// Register a new user. Never establishes a session.
    async fn register(
        &self,
        email: &str,
        password: Option<&str>,
    ) -> Result<AuthOutcome, Self::Error>;

    /// Request a password-reset mail for `email`.
    async fn forgot_password(&self, email: &str) -> Result<AuthOutcome, Self::Error>;

    /// Set a new password for the current user.
    async fn update_password(&self, new_password: &str) -> Result<AuthOutcome, Self::Error>;
}

/// Generic resource-oriented data access against the backend.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Infrastructure error type of the concrete provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of a resource collection.
    async fn list(
        &self,
        resource: &str,
        pagination: &Pagination,
        sorters: &[Sorter],
        filters: &[FilterClause],
    ) -> Result<ListResult, Self::Error>;

    /// Fetch a single record by id.
    async fn get_one(&self, resource: &str, id: &str) -> Result<Record, Self::Error>;

    /// Fetch several records by id in one request.
    async fn get_many(&self, resource: &str, ids: &[String]) -> Result<Vec<Record>, Self::Error>;

    /// Create a record.
    async fn create(&self, resource: &str, payload: Record) -> Result<Record, Self::Error>;

    /// Partially update a record.
    async fn update(&self, resource: &str, id: &str, payload: Record)
        -> Result<Record, Self::Error>;

    /// Delete a record; some servers expect a body on delete.
    async fn delete_one(
        &self,
        resource: &str,
        id: &str,
        payload: Option<Record>,
    ) -> Result<Record, Self::Error>;

    /// Create several records in one bulk request.
    async fn create_many(
        &self,
        resource: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, Self::Error>;

    /// Apply the same partial update to several records.
    async fn update_many(
        &self,
        resource: &str,
        ids: &[String],
        variables: Record,
    ) -> Result<Vec<Record>, Self::Error>;

    /// Delete several records in one bulk request.
    async fn delete_many(&self, resource: &str, ids: &[String])
        -> Result<Vec<Record>, Self::Error>;

    /// Escape hatch: dispatch an arbitrary request with list-style
    /// sort/filter serialization.
    async fn custom(&self, request: CustomRequest) -> Result<Record, Self::Error>;

    /// The configured base URL. No side effects.
    fn api_url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failure_never_names_the_wrong_field() {
        let outcome = LoginOutcome::failure();
        let error = outcome.error.expect("failure carries an error");
        assert_eq!(error.message, "Invalid email or password");
        assert!(!outcome.authenticated);
        assert_eq!(outcome.redirect_to, None);
    }

    #[test]
    fn unauthenticated_check_requests_logout_and_login_redirect() {
        let check = SessionCheck::unauthenticated();
        assert!(!check.authenticated);
        assert!(check.force_logout);
        assert_eq!(check.redirect_to.as_deref(), Some(LOGIN_ROUTE));
        assert_eq!(check.error.unwrap().message, "Unauthorized");
    }

    #[test]
    fn logout_always_succeeds_toward_login() {
        let outcome = LogoutOutcome::default();
        assert!(outcome.success);
        assert_eq!(outcome.redirect_to, LOGIN_ROUTE);
    }

    #[test]
    fn custom_request_defaults_to_get() {
        let request = CustomRequest::get("https://example.test/status");
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.payload.is_none());
        assert!(request.query.is_empty());
    }
}
