/// HTTP implementation of the recommender backend
///
/// Thin reqwest wrapper around the backend's JSON API. Every call checks the
/// response status and maps non-success to an error carrying status + body;
/// retry policy belongs to the callers, never to this layer.
use std::time::Duration;

use reqwest::{Client as HttpClient, Response, StatusCode};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        AuthResponse, ImageKind, LoginRequest, MovieDetail, Profile, Recommendation,
        RecommendationsResponse, SignupRequest, SurveyFilters, SurveySchema, SurveySubmission,
        MembershipResponse, WatchlistEntry, WatchlistResponse,
    },
};

use super::MovieBackend;

#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a non-success response to an error, reading the body for context
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!(status = %status, body = %message, "Backend request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::CONFLICT => AppError::Auth(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait::async_trait]
impl MovieBackend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;

        let auth: AuthResponse = Self::check_status(response).await?.json().await?;
        tracing::info!(user_id = auth.user_id, "Signed in");
        Ok(auth)
    }

    async fn signup(&self, request: &SignupRequest) -> AppResult<AuthResponse> {
        let response = self
            .http_client
            .post(self.url("/auth/signup"))
            .json(request)
            .send()
            .await?;

        let auth: AuthResponse = Self::check_status(response).await?.json().await?;
        tracing::info!(user_id = auth.user_id, "Account created");
        Ok(auth)
    }

    async fn survey_schema(&self) -> AppResult<SurveySchema> {
        let response = self
            .http_client
            .get(self.url("/survey/schema"))
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn submit_survey(&self, submission: &SurveySubmission) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.url("/survey/submit"))
            .json(submission)
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(user_id = submission.user_id, "Survey submitted");
        Ok(())
    }

    async fn profile(&self, user_id: i64) -> AppResult<Profile> {
        let response = self
            .http_client
            .get(self.url(&format!("/profile/{}", user_id)))
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn save_profile(&self, profile: &Profile) -> AppResult<Profile> {
        let response = self
            .http_client
            .post(self.url(&format!("/profile/{}", profile.user_id)))
            .json(profile)
            .send()
            .await?;

        let saved: Profile = Self::check_status(response).await?.json().await?;
        tracing::info!(user_id = saved.user_id, "Profile saved");
        Ok(saved)
    }

    async fn recommendations(
        &self,
        user_id: i64,
        filters: &SurveyFilters,
        count: u32,
    ) -> AppResult<Vec<Recommendation>> {
        let mut query = vec![("n".to_string(), count.to_string())];
        query.extend(filters.to_query_pairs());

        let response = self
            .http_client
            .get(self.url(&format!("/recommend/{}", user_id)))
            .query(&query)
            .send()
            .await?;

        let body: RecommendationsResponse = Self::check_status(response).await?.json().await?;

        tracing::info!(
            user_id = user_id,
            results = body.recommendations.len(),
            filtered = !filters.is_empty(),
            "Recommendations fetched"
        );

        Ok(body.recommendations)
    }

    async fn movie_detail(&self, movie_id: i64) -> AppResult<MovieDetail> {
        let response = self
            .http_client
            .get(self.url(&format!("/movie/{}", movie_id)))
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn watchlist(&self, user_id: i64) -> AppResult<Vec<WatchlistEntry>> {
        let response = self
            .http_client
            .get(self.url(&format!("/watchlist/{}", user_id)))
            .send()
            .await?;

        let body: WatchlistResponse = Self::check_status(response).await?.json().await?;
        Ok(body.watchlist)
    }

    async fn check_membership(&self, user_id: i64, movie_id: i64) -> AppResult<bool> {
        let response = self
            .http_client
            .get(self.url(&format!("/watchlist/{}/check/{}", user_id, movie_id)))
            .send()
            .await?;

        let body: MembershipResponse = Self::check_status(response).await?.json().await?;
        Ok(body.in_watchlist)
    }

    async fn add_to_watchlist(&self, user_id: i64, movie_id: i64) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.url(&format!("/watchlist/{}/add/{}", user_id, movie_id)))
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(user_id = user_id, movie_id = movie_id, "Watchlist add confirmed");
        Ok(())
    }

    async fn remove_from_watchlist(&self, user_id: i64, movie_id: i64) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.url(&format!("/watchlist/{}/remove/{}", user_id, movie_id)))
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(user_id = user_id, movie_id = movie_id, "Watchlist remove confirmed");
        Ok(())
    }

    fn image_url(&self, movie_id: i64, kind: ImageKind) -> String {
        format!("{}?type={}", self.url(&format!("/image/{}", movie_id)), kind.as_str())
    }
}
