/// Durable session store
///
/// Holds the signed-in user's id and auth token, persisted as a JSON file so
/// the session survives process restarts. One logical writer at a time,
/// last write wins. No component reads the storage file directly; everything
/// goes through a shared handle to this store.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::Session,
};

#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Opens the store, loading any previously persisted session
    ///
    /// A missing or unreadable session file is treated as signed out rather
    /// than an error; a stale file must never block the anonymous entry view.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let current = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Session>(&json) {
                Ok(session) => {
                    tracing::info!(user_id = session.user_id, "Restored session");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable session file");
                    None
                }
            },
            Err(_) => None,
        };

        Self {
            path,
            current: Arc::new(RwLock::new(current)),
        }
    }

    /// Current session, if signed in
    pub async fn get(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn user_id(&self) -> Option<i64> {
        self.current.read().await.as_ref().map(|s| s.user_id)
    }

    /// Records a successful sign-in or sign-up and persists it
    pub async fn set(&self, user_id: i64, token: String) -> AppResult<Session> {
        let session = Session::new(user_id, token);
        let json = serde_json::to_string(&session)?;

        let mut slot = self.current.write().await;
        tokio::fs::write(&self.path, json).await?;
        *slot = Some(session.clone());

        tracing::info!(user_id = user_id, "Session stored");
        Ok(session)
    }

    /// Sign-out: forgets the session and removes the file
    ///
    /// Callers follow this with a navigation reset to the anonymous entry
    /// view (the Navigator's sign-out transition does both).
    pub async fn clear(&self) -> AppResult<()> {
        let mut slot = self.current.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *slot = None;

        tracing::info!("Session cleared");
        Ok(())
    }
}
