/// Profile coordinator
///
/// Joined fetch of the genre schema and the user's profile. The schema is
/// load-bearing for the genre picker, so its failure is terminal; a missing
/// profile degrades to an empty default instead of failing the view.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    error::AppResult,
    fetch::FetchGuard,
    models::Profile,
};

use super::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    /// All known genres, for the preference picker
    pub schema_genres: Vec<String>,
    pub profile: Profile,
}

#[derive(Clone)]
pub struct ProfileCoordinator {
    backend: Arc<dyn MovieBackend>,
    guard: FetchGuard,
    state: Arc<RwLock<ViewState<ProfileView>>>,
}

impl ProfileCoordinator {
    pub fn new(backend: Arc<dyn MovieBackend>) -> Self {
        Self {
            backend,
            guard: FetchGuard::new(),
            state: Arc::new(RwLock::new(ViewState::Loading)),
        }
    }

    pub async fn state(&self) -> ViewState<ProfileView> {
        self.state.read().await.clone()
    }

    pub async fn load(&self, user_id: i64) {
        let outcome = self
            .guard
            .run(async {
                tokio::join!(
                    self.backend.survey_schema(),
                    self.backend.profile(user_id),
                )
            })
            .await;

        let Some(((schema, profile), ticket)) = outcome else {
            return;
        };

        let next = match schema {
            Ok(schema) => {
                // Per-field fallback: a failed profile fetch becomes a default
                let profile = profile.unwrap_or_else(|e| {
                    tracing::debug!(user_id = user_id, error = %e, "Using default profile");
                    Profile::empty(user_id)
                });

                ViewState::Ready(ProfileView {
                    schema_genres: schema.genres,
                    profile,
                })
            }
            Err(e) => {
                tracing::warn!(user_id = user_id, error = %e, "Profile view load failed");
                ViewState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().await;
        // A newer load can apply between run returning and this lock
        if ticket.is_current() {
            *state = next;
        }
    }

    /// Saves the edited profile
    ///
    /// Failure is a blocking error surfaced inline; the edited copy stays in
    /// the view so the user can retry. Success replaces the view's profile
    /// with the server-confirmed record.
    pub async fn save(&self, profile: &Profile) -> AppResult<Profile> {
        let saved = self.backend.save_profile(profile).await?;

        let mut state = self.state.write().await;
        if let ViewState::Ready(view) = &mut *state {
            view.profile = saved.clone();
        }

        Ok(saved)
    }

    pub fn teardown(&self) {
        self.guard.invalidate();
    }
}
