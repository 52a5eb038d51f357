/// Navigation state machine
///
/// Maps the current path + session presence to the view to render and
/// enforces the redirect rules. Protected views reached without a session
/// redirect to SignIn; this one policy is applied uniformly.
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    api::MovieBackend,
    error::AppResult,
    models::{LoginRequest, SignupRequest, SurveyFilters},
    session::SessionStore,
};

/// Every reachable view
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    Survey,
    Profile,
    Feed { filters: SurveyFilters },
    /// Deep-linkable: resolvable from a movie id alone
    MovieDetail { movie_id: i64 },
    Watchlist,
    About,
}

impl Route {
    pub fn feed() -> Self {
        Route::Feed {
            filters: SurveyFilters::default(),
        }
    }

    /// Views that require a session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Profile | Route::Watchlist)
    }
}

#[derive(Clone)]
pub struct Navigator {
    sessions: SessionStore,
    current: Arc<RwLock<Route>>,
}

impl Navigator {
    pub fn new(sessions: SessionStore) -> Self {
        Self {
            sessions,
            current: Arc::new(RwLock::new(Route::Home)),
        }
    }

    pub async fn current(&self) -> Route {
        self.current.read().await.clone()
    }

    /// Initial state resolution: signed in lands on the feed, anonymous on Home
    pub async fn resolve_entry(&self) -> Route {
        let route = if self.sessions.get().await.is_some() {
            Route::feed()
        } else {
            Route::Home
        };
        self.set_current(route.clone()).await;
        route
    }

    /// Navigates to a target view, applying the protected-view redirect
    pub async fn navigate(&self, target: Route) -> Route {
        let resolved = if target.is_protected() && self.sessions.get().await.is_none() {
            tracing::debug!(target = ?target, "Protected view without session, redirecting");
            Route::SignIn
        } else {
            target
        };
        self.set_current(resolved.clone()).await;
        resolved
    }

    /// Survey submit carries the submitted filters into the feed
    pub async fn survey_submitted(&self, filters: SurveyFilters) -> Route {
        let route = Route::Feed { filters };
        self.set_current(route.clone()).await;
        route
    }

    /// Sign-out: clears the session first, then resets to the anonymous entry
    pub async fn sign_out(&self) -> AppResult<Route> {
        self.sessions.clear().await?;
        self.set_current(Route::Home).await;
        Ok(Route::Home)
    }

    async fn set_current(&self, route: Route) {
        *self.current.write().await = route;
    }
}

/// Credential submission flows for the SignIn and SignUp views
///
/// Failures are blocking errors surfaced inline on the form; the submission
/// stays retryable and no session state is touched until success.
#[derive(Clone)]
pub struct AuthFlow {
    backend: Arc<dyn MovieBackend>,
    sessions: SessionStore,
}

impl AuthFlow {
    pub fn new(backend: Arc<dyn MovieBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// SignIn success stores the session and lands on the feed
    pub async fn sign_in(&self, request: &LoginRequest) -> AppResult<Route> {
        let auth = self.backend.login(request).await?;
        self.sessions.set(auth.user_id, auth.token).await?;
        Ok(Route::feed())
    }

    /// SignUp success stores the session and continues to profile setup
    pub async fn sign_up(&self, request: &SignupRequest) -> AppResult<Route> {
        let auth = self.backend.signup(request).await?;
        self.sessions.set(auth.user_id, auth.token).await?;
        Ok(Route::Profile)
    }
}
