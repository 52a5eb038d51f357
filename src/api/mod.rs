/// Recommender backend abstraction
///
/// All recommendation computation, authentication, and persistence live in
/// the external service; the client only issues calls against this trait.
/// Coordinators hold it as a trait object so tests can substitute a mock.
use crate::{
    error::AppResult,
    models::{
        AuthResponse, ImageKind, LoginRequest, MovieDetail, Profile, Recommendation,
        SignupRequest, SurveyFilters, SurveySchema, SurveySubmission, WatchlistEntry,
    },
};

pub mod http;

pub use http::HttpBackend;

/// Trait covering every backend operation the client orchestrates
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieBackend: Send + Sync {
    /// POST /auth/login
    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse>;

    /// POST /auth/signup
    async fn signup(&self, request: &SignupRequest) -> AppResult<AuthResponse>;

    /// GET /survey/schema
    async fn survey_schema(&self) -> AppResult<SurveySchema>;

    /// POST /survey/submit
    ///
    /// Best-effort: callers do not block navigation on the result.
    async fn submit_survey(&self, submission: &SurveySubmission) -> AppResult<()>;

    /// GET /profile/{user_id}
    async fn profile(&self, user_id: i64) -> AppResult<Profile>;

    /// POST /profile/{user_id}
    async fn save_profile(&self, profile: &Profile) -> AppResult<Profile>;

    /// GET /recommend/{user_id}?n=&genres=&min_year=&max_year=
    ///
    /// Unset filter bounds are omitted from the query string entirely.
    async fn recommendations(
        &self,
        user_id: i64,
        filters: &SurveyFilters,
        count: u32,
    ) -> AppResult<Vec<Recommendation>>;

    /// GET /movie/{movie_id}
    async fn movie_detail(&self, movie_id: i64) -> AppResult<MovieDetail>;

    /// GET /watchlist/{user_id}
    async fn watchlist(&self, user_id: i64) -> AppResult<Vec<WatchlistEntry>>;

    /// GET /watchlist/{user_id}/check/{movie_id}
    async fn check_membership(&self, user_id: i64, movie_id: i64) -> AppResult<bool>;

    /// POST /watchlist/{user_id}/add/{movie_id}
    async fn add_to_watchlist(&self, user_id: i64, movie_id: i64) -> AppResult<()>;

    /// POST /watchlist/{user_id}/remove/{movie_id}
    async fn remove_from_watchlist(&self, user_id: i64, movie_id: i64) -> AppResult<()>;

    /// URL of a movie image; the binary payload is fetched by the renderer
    fn image_url(&self, movie_id: i64, kind: ImageKind) -> String;
}
