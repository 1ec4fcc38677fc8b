//! In-memory session store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use pressroom_core::error::StoreError;
use pressroom_core::provider::SessionStore;
use pressroom_core::session::Session;

/// Volatile store for tests and ephemeral runs. Same contract as the
/// file-backed store, minus durability.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    /// An empty (unauthenticated) store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a session.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: RwLock::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, session: Session) -> Result<(), StoreError> {
        *self.slot.write().await = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }

    async fn update_token(&self, token: Option<String>) -> Result<(), StoreError> {
        // Holding the write guard across read-modify-write keeps the update
        // atomic with respect to concurrent set/clear.
        let mut slot = self.slot.write().await;
        if let Some(session) = slot.as_mut() {
            session.token = token;
        }
        Ok(())
    }
}
