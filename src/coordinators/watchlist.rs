/// Watchlist view coordinator
///
/// Loads the user's saved movies. Per-card membership state on other views
/// is the membership controller's job; this view shows the confirmed list.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    fetch::FetchGuard,
    models::WatchlistEntry,
};

use super::ViewState;

#[derive(Clone)]
pub struct WatchlistCoordinator {
    backend: Arc<dyn MovieBackend>,
    guard: FetchGuard,
    state: Arc<RwLock<ViewState<Vec<WatchlistEntry>>>>,
}

impl WatchlistCoordinator {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self {
            backend,
            guard: FetchGuard::new(),
            state: Arc::new(RwLock::new(ViewState::Loading)),
        }
    }

    pub async fn state(&self) -> ViewState<Vec<WatchlistEntry>> {
        self.state.read().await.clone()
    }

    pub async fn load(&self, user_id: i64) {
        let outcome = self.guard.run(self.backend.watchlist(user_id)).await;

        let Some((result, ticket)) = outcome else {
            return;
        };

        let next = match result {
            Ok(entries) => {
                tracing::debug!(user_id = user_id, entries = entries.len(), "Watchlist loaded");
                ViewState::Ready(entries)
            }
            Err(e) => {
                tracing::warn!(user_id = user_id, error = %e, "Watchlist load failed");
                ViewState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().await;
        // A newer load can apply between run returning and this lock
        if ticket.is_current() {
            *state = next;
        }
    }

    pub fn teardown(&self) {
        self.guard.invalidate();
    }
}
