//! Directory-backed [`AuthProvider`] implementation.
//!
//! The session lifecycle is a two-state machine: unauthenticated and
//! authenticated. Login is the only way in; logout, a failed session check,
//! and a forced logout after a 401/403 are the ways out. Every transition
//! goes through the session store, whose operations are atomic.

use std::sync::Arc;

use async_trait::async_trait;

use pressroom_core::error::{HttpError, StoreError};
use pressroom_core::provider::{
    AuthFailure, AuthOutcome, AuthProvider, ErrorAction, LoginOutcome, LogoutOutcome,
    SessionCheck, SessionStore,
};
use pressroom_core::session::{Identity, Session};

use crate::directory::{DirectoryUser, UserDirectory};

/// Auth adapter looking users up in a directory and persisting the session.
pub struct DirectoryAuthProvider {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn SessionStore>,
}

impl DirectoryAuthProvider {
    /// Wire the adapter to a directory and a session store.
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn SessionStore>) -> Self {
        Self { directory, store }
    }
}

#[async_trait]
impl AuthProvider for DirectoryAuthProvider {
    type Error = StoreError;

    async fn login(
        &self,
        email: &str,
        _password: Option<&str>,
    ) -> Result<LoginOutcome, Self::Error> {
        // The mock directory authenticates by presence alone; a real
        // directory would also verify the password. Either way the failure
        // message stays fixed so callers cannot probe which field was wrong.
        match self.directory.find_by_email(email).await {
            Some(user) => {
                self.store
                    .set(Session::new(user.email, user.roles, None))
                    .await?;
                tracing::info!(email, "Login succeeded");
                Ok(LoginOutcome::success())
            }
            None => {
                tracing::warn!(email, "Login rejected");
                Ok(LoginOutcome::failure())
            }
        }
    }

    async fn check(&self) -> Result<SessionCheck, Self::Error> {
        match self.store.get().await? {
            Some(_) => Ok(SessionCheck::authenticated()),
            None => Ok(SessionCheck::unauthenticated()),
        }
    }

    async fn logout(&self) -> Result<LogoutOutcome, Self::Error> {
        self.store.clear().await?;
        tracing::info!("Logged out");
        Ok(LogoutOutcome::default())
    }

    fn on_error(&self, error: &HttpError) -> ErrorAction {
        if error.is_auth_failure() {
            tracing::warn!(status = ?error.status_code, "Authorization failure, forcing logout");
            ErrorAction::force_logout()
        } else {
            ErrorAction::default()
        }
    }

    async fn permissions(&self) -> Result<Option<Vec<String>>, Self::Error> {
        Ok(self.store.get().await?.and_then(|session| session.roles))
    }

    async fn identity(&self) -> Result<Option<Identity>, Self::Error> {
        Ok(self.store.get().await?.map(|session| session.identity()))
    }

    async fn register(
        &self,
        email: &str,
        _password: Option<&str>,
    ) -> Result<AuthOutcome, Self::Error> {
        if self.directory.find_by_email(email).await.is_some() {
            return Ok(AuthOutcome::failure(AuthFailure::user_exists()));
        }

        // Registration appends to the directory but never signs the user
        // in; login stays a separate step.
        self.directory.insert(DirectoryUser::new(email)).await;
        tracing::info!(email, "User registered");
        Ok(AuthOutcome::success())
    }

    async fn forgot_password(&self, email: &str) -> Result<AuthOutcome, Self::Error> {
        // The reset mail goes out through an external collaborator.
        tracing::info!(email, "Password reset requested");
        Ok(AuthOutcome::success())
    }

    async fn update_password(&self, _new_password: &str) -> Result<AuthOutcome, Self::Error> {
        // The concrete credential update lives in an external collaborator.
        tracing::info!("Password update requested");
        Ok(AuthOutcome::success())
    }
}
