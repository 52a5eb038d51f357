/// Movie detail coordinator
///
/// Deep-linkable: bootstraps its whole view model from a movie id alone, so
/// the detail view never depends on state carried over from a prior
/// navigation.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    fetch::FetchGuard,
    models::MovieDetail,
    overlay::TrailerOverlay,
};

use super::ViewState;

#[derive(Clone)]
pub struct MovieDetailCoordinator {
    backend: Arc<dyn MovieBackend>,
    guard: FetchGuard,
    state: Arc<RwLock<ViewState<MovieDetail>>>,
}

impl MovieDetailCoordinator {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self {
            backend,
            guard: FetchGuard::new(),
            state: Arc::new(RwLock::new(ViewState::Loading)),
        }
    }

    pub async fn state(&self) -> ViewState<MovieDetail> {
        self.state.read().await.clone()
    }

    /// Fetches the movie by id; failure is terminal for the view
    pub async fn load(&self, movie_id: i64) {
        let outcome = self.guard.run(self.backend.movie_detail(movie_id)).await;

        let Some((result, ticket)) = outcome else {
            return;
        };

        let next = match result {
            Ok(detail) => {
                tracing::debug!(movie_id = movie_id, title = %detail.title, "Movie detail loaded");
                ViewState::Ready(detail)
            }
            Err(e) => {
                tracing::warn!(movie_id = movie_id, error = %e, "Movie detail load failed");
                ViewState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().await;
        // A newer load can apply between run returning and this lock
        if ticket.is_current() {
            *state = next;
        }
    }

    /// Opens the trailer overlay, if this movie carries a trailer
    pub async fn play_trailer(&self, overlay: &TrailerOverlay) -> bool {
        let state = self.state.read().await;
        let trailer = state
            .ready()
            .and_then(|detail| detail.trailer_youtube_id.clone());

        match trailer {
            Some(trailer_ref) => {
                overlay.open(&trailer_ref);
                true
            }
            None => false,
        }
    }

    pub fn teardown(&self) {
        self.guard.invalidate();
    }
}
