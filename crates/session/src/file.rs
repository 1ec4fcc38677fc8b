//! JSON-file-backed session store.
//!
//! One durable key: a single JSON file holding the serialized
//! [`Session`] record. Absence of the file means unauthenticated.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use pressroom_core::error::StoreError;
use pressroom_core::provider::SessionStore;
use pressroom_core::session::Session;

/// Durable store persisting the session as one JSON file.
///
/// All operations serialize behind an async mutex, so a read-modify-write
/// such as [`SessionStore::update_token`] cannot interleave with a
/// concurrent `set` or `clear`. Writes go through a sibling temp file and a
/// rename, so a crash mid-write never leaves a torn record behind.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Create a store backed by the given file path.
    ///
    /// Parent directories are created lazily on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the durable key.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record without taking the lock. Callers hold the lock.
    async fn read_record(&self) -> Result<Option<Session>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the record atomically. Callers hold the lock.
    async fn write_record(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Result<Option<Session>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read_record().await
    }

    async fn set(&self, session: Session) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write_record(&session).await?;
        tracing::debug!(email = %session.email, "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_token(&self, token: Option<String>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        match self.read_record().await? {
            Some(mut session) => {
                session.token = token;
                self.write_record(&session).await
            }
            // No session record to carry the token; nothing to persist.
            None => Ok(()),
        }
    }
}
