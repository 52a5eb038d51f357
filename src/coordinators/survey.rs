/// Taste survey coordinator
///
/// Loads the read-only survey schema once per view. Submission is
/// fire-and-forget: the backend call's outcome never blocks the navigation
/// into the filtered feed.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    fetch::FetchGuard,
    models::{SurveyFilters, SurveySchema, SurveySubmission},
};

use super::ViewState;

#[derive(Clone)]
pub struct SurveyCoordinator {
    backend: Arc<dyn MovieBackend>,
    guard: FetchGuard,
    state: Arc<RwLock<ViewState<SurveySchema>>>,
}

impl SurveyCoordinator {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self {
            backend,
            guard: FetchGuard::new(),
            state: Arc::new(RwLock::new(ViewState::Loading)),
        }
    }

    pub async fn state(&self) -> ViewState<SurveySchema> {
        self.state.read().await.clone()
    }

    /// Fetches the survey schema; failure is terminal for the view
    pub async fn load(&self) {
        let outcome = self.guard.run(self.backend.survey_schema()).await;

        let Some((result, ticket)) = outcome else {
            return;
        };

        let next = match result {
            Ok(schema) => {
                tracing::debug!(genres = schema.genres.len(), "Survey schema loaded");
                ViewState::Ready(schema)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Survey schema load failed");
                ViewState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().await;
        // A newer load can apply between run returning and this lock
        if ticket.is_current() {
            *state = next;
        }
    }

    /// Submits the survey and returns the filters to carry into the feed
    ///
    /// The submission itself is best-effort; errors are swallowed and the
    /// returned filters are exactly what the user selected, with unset year
    /// bounds absent.
    pub async fn submit(&self, user_id: i64, filters: SurveyFilters) -> SurveyFilters {
        let submission = SurveySubmission {
            user_id,
            genres: filters.genres.clone(),
            min_year: filters.min_year,
            max_year: filters.max_year,
        };

        if let Err(e) = self.backend.submit_survey(&submission).await {
            tracing::debug!(user_id = user_id, error = %e, "Survey submit dropped");
        }

        filters
    }

    pub fn teardown(&self) {
        self.guard.invalidate();
    }
}
