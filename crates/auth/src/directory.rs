//! The user directory seam.
//!
//! The directory is an external collaborator in production; the in-memory
//! implementation here mirrors the stock user list the fixed backend ships
//! with, and is what the admin binary and the tests run against.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use pressroom_core::roles::{ROLE_ADMIN, ROLE_EDITOR};

/// A user as the directory knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    /// Opaque user id.
    pub id: String,
    /// Login email, the directory's lookup key.
    pub email: String,
    /// Role names granted to the user.
    pub roles: Option<Vec<String>>,
}

impl DirectoryUser {
    /// A user with a freshly minted id and no roles.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            roles: None,
        }
    }
}

/// Lookup and append access to the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by exact email.
    async fn find_by_email(&self, email: &str) -> Option<DirectoryUser>;

    /// Append a user. The caller has already checked for duplicates.
    async fn insert(&self, user: DirectoryUser);
}

/// In-memory directory seeded with the backend's stock users.
pub struct MemoryUserDirectory {
    users: RwLock<Vec<DirectoryUser>>,
}

impl MemoryUserDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// The stock mock users the fixed backend knows about.
    pub fn with_mock_users() -> Self {
        let users = vec![
            DirectoryUser {
                id: Uuid::new_v4().to_string(),
                email: "apip@mail.com".to_string(),
                roles: Some(vec![ROLE_ADMIN.to_string()]),
            },
            DirectoryUser {
                id: Uuid::new_v4().to_string(),
                email: "rania@mail.com".to_string(),
                roles: Some(vec![ROLE_EDITOR.to_string()]),
            },
        ];
        Self {
            users: RwLock::new(users),
        }
    }

    /// Number of users currently in the directory.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Option<DirectoryUser> {
        self.users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }

    async fn insert(&self, user: DirectoryUser) {
        self.users.write().await.push(user);
    }
}
