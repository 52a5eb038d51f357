/// Recommendation feed coordinator
///
/// Issues a joined fetch (recommendations + profile) and derives the three
/// feed sections. The recommendations call is load-bearing: its failure is
/// terminal for the view. The profile call only decorates the greeting, so
/// its failure degrades to an empty display name.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    fetch::FetchGuard,
    models::{Recommendation, SurveyFilters},
    overlay::TrailerOverlay,
};

use super::ViewState;

/// Derived view model for one feed load
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedView {
    pub display_name: String,
    /// First recommendation, or absent when the list is empty
    pub featured: Option<Recommendation>,
    /// The list exactly as ranked by the backend
    pub recommended: Vec<Recommendation>,
    /// The same list reversed; a placeholder ranking, not an independent query
    pub popular: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct FeedCoordinator {
    backend: Arc<dyn MovieBackend>,
    guard: FetchGuard,
    state: Arc<RwLock<ViewState<FeedView>>>,
    feed_size: u32,
}

impl FeedCoordinator {
    pub fn new(backend: Arc<dyn MovieBackend>, feed_size: u32) -> Self {
        Self {
            backend,
            guard: FetchGuard::new(),
            state: Arc::new(RwLock::new(ViewState::Loading)),
            feed_size,
        }
    }

    pub async fn state(&self) -> ViewState<FeedView> {
        self.state.read().await.clone()
    }

    /// Loads the feed for a user, carrying any survey filters
    ///
    /// Superseded loads (a newer load or a teardown mid-flight) leave the
    /// view state untouched.
    pub async fn load(&self, user_id: i64, filters: &SurveyFilters) {
        let outcome = self
            .guard
            .run(async {
                tokio::join!(
                    self.backend.recommendations(user_id, filters, self.feed_size),
                    self.backend.profile(user_id),
                )
            })
            .await;

        let Some(((recommendations, profile), ticket)) = outcome else {
            return;
        };

        let next = match recommendations {
            Ok(list) => {
                // Profile failure alone degrades to an empty greeting
                let display_name = profile
                    .map(|p| p.display_name().to_string())
                    .unwrap_or_default();

                tracing::info!(
                    user_id = user_id,
                    results = list.len(),
                    "Feed loaded"
                );

                ViewState::Ready(FeedView {
                    display_name,
                    featured: list.first().cloned(),
                    popular: list.iter().rev().cloned().collect(),
                    recommended: list,
                })
            }
            Err(e) => {
                tracing::warn!(user_id = user_id, error = %e, "Feed load failed");
                ViewState::Failed(e.to_string())
            }
        };

        let mut state = self.state.write().await;
        // A newer load can apply between run returning and this lock
        if ticket.is_current() {
            *state = next;
        }
    }

    /// Opens the trailer overlay for a feed item, if it carries a trailer
    pub async fn play_trailer(&self, movie_id: i64, overlay: &TrailerOverlay) -> bool {
        let state = self.state.read().await;
        let Some(view) = state.ready() else {
            return false;
        };

        let trailer = view
            .recommended
            .iter()
            .find(|r| r.movie_id == movie_id)
            .and_then(|r| r.trailer_youtube_id.clone());

        match trailer {
            Some(trailer_ref) => {
                overlay.open(&trailer_ref);
                true
            }
            None => false,
        }
    }

    /// View teardown: pending loads become permanently stale
    pub fn teardown(&self) {
        self.guard.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMovieBackend;
    use crate::error::AppError;
    use crate::models::Profile;

    fn rec(movie_id: i64, title: &str) -> Recommendation {
        Recommendation {
            movie_id,
            title: title.to_string(),
            genres: "Drama".to_string(),
            predicted_rating: 4.0,
            year: None,
            rating: None,
            trailer_youtube_id: None,
        }
    }

    fn named_profile(user_id: i64, name: &str) -> Profile {
        Profile {
            name: Some(name.to_string()),
            ..Profile::empty(user_id)
        }
    }

    #[tokio::test]
    async fn test_feed_derivation_featured_and_popular() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_recommendations()
            .returning(|_, _, _| Ok(vec![rec(5, "Heat"), rec(7, "Alien")]));
        backend
            .expect_profile()
            .returning(|user_id| Ok(named_profile(user_id, "Ada")));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        coordinator.load(1, &SurveyFilters::default()).await;

        let state = coordinator.state().await;
        let view = state.ready().unwrap();
        assert_eq!(view.display_name, "Ada");
        assert_eq!(view.featured.as_ref().unwrap().movie_id, 5);
        assert_eq!(
            view.recommended.iter().map(|r| r.movie_id).collect::<Vec<_>>(),
            vec![5, 7]
        );
        assert_eq!(
            view.popular.iter().map(|r| r.movie_id).collect::<Vec<_>>(),
            vec![7, 5]
        );
    }

    #[tokio::test]
    async fn test_empty_feed_has_no_featured() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_recommendations()
            .returning(|_, _, _| Ok(vec![]));
        backend
            .expect_profile()
            .returning(|user_id| Ok(Profile::empty(user_id)));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        coordinator.load(1, &SurveyFilters::default()).await;

        let state = coordinator.state().await;
        let view = state.ready().unwrap();
        assert_eq!(view.featured, None);
        assert!(view.recommended.is_empty());
        assert!(view.popular.is_empty());
    }

    #[tokio::test]
    async fn test_recommendations_failure_is_terminal() {
        let mut backend = MockMovieBackend::new();
        backend.expect_recommendations().returning(|_, _, _| {
            Err(AppError::Api {
                status: 503,
                message: "Model not loaded".to_string(),
            })
        });
        backend
            .expect_profile()
            .returning(|user_id| Ok(Profile::empty(user_id)));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        coordinator.load(1, &SurveyFilters::default()).await;

        assert!(coordinator.state().await.is_failed());
    }

    #[tokio::test]
    async fn test_profile_failure_degrades_to_empty_name() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_recommendations()
            .returning(|_, _, _| Ok(vec![rec(5, "Heat")]));
        backend
            .expect_profile()
            .returning(|_| Err(AppError::NotFound("no profile".to_string())));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        coordinator.load(1, &SurveyFilters::default()).await;

        let state = coordinator.state().await;
        let view = state.ready().unwrap();
        assert_eq!(view.display_name, "");
        assert_eq!(view.recommended.len(), 1);
    }

    #[tokio::test]
    async fn test_filters_are_passed_through() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_recommendations()
            .withf(|_, filters, count| {
                filters.genres == vec!["Action".to_string()]
                    && filters.min_year == Some(2000)
                    && filters.max_year.is_none()
                    && *count == 12
            })
            .returning(|_, _, _| Ok(vec![]));
        backend
            .expect_profile()
            .returning(|user_id| Ok(Profile::empty(user_id)));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        let filters = SurveyFilters {
            genres: vec!["Action".to_string()],
            min_year: Some(2000),
            max_year: None,
        };
        coordinator.load(1, &filters).await;
        assert!(coordinator.state().await.ready().is_some());
    }

    #[tokio::test]
    async fn test_play_trailer_only_when_available() {
        let mut backend = MockMovieBackend::new();
        backend.expect_recommendations().returning(|_, _, _| {
            let mut with_trailer = rec(5, "Heat");
            with_trailer.trailer_youtube_id = Some("abc123".to_string());
            Ok(vec![with_trailer, rec(7, "Alien")])
        });
        backend
            .expect_profile()
            .returning(|user_id| Ok(Profile::empty(user_id)));

        let coordinator = FeedCoordinator::new(Arc::new(backend), 12);
        coordinator.load(1, &SurveyFilters::default()).await;

        let overlay = TrailerOverlay::new_unlocked();
        assert!(coordinator.play_trailer(5, &overlay).await);
        assert_eq!(overlay.current_trailer(), Some("abc123".to_string()));

        overlay.close();
        assert!(!coordinator.play_trailer(7, &overlay).await);
        assert!(!overlay.is_open());
    }
}
