use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The client's record of an authenticated user
///
/// Absence of a Session is a first-class state (anonymous browsing).
/// At most one session is active per client instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: i64, token: String) -> Self {
        Self {
            user_id,
            token,
            signed_in_at: Utc::now(),
        }
    }
}

// ============================================================================
// Auth wire types
// ============================================================================

/// Request body for POST /auth/login
///
/// The backend accepts either a raw user id or an account (username or
/// email) + password pair. Unset fields are sent as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginRequest {
    pub user_id: Option<i64>,
    pub account: Option<String>,
    pub password: Option<String>,
}

/// Request body for POST /auth/signup
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub account: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Response from both auth endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub token: String,
}

// ============================================================================
// Survey
// ============================================================================

/// Read-only reference data for the taste survey, fetched once per view
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SurveySchema {
    pub genres: Vec<String>,
    /// Sorted list of known release years; only the bounds matter
    pub years: Vec<i32>,
}

impl SurveySchema {
    /// Inclusive (min, max) year bounds, or None if the backend sent no years
    pub fn year_range(&self) -> Option<(i32, i32)> {
        match (self.years.first(), self.years.last()) {
            (Some(min), Some(max)) => Some((*min, *max)),
            _ => None,
        }
    }
}

/// Filters carried from the survey into the feed as query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyFilters {
    pub genres: Vec<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl SurveyFilters {
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.min_year.is_none() && self.max_year.is_none()
    }

    /// Query pairs for GET /recommend, carrying exactly the set filters.
    /// Unset bounds are omitted entirely, not sent as null or empty string.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.genres.is_empty() {
            pairs.push(("genres".to_string(), self.genres.join(",")));
        }
        if let Some(min_year) = self.min_year {
            pairs.push(("min_year".to_string(), min_year.to_string()));
        }
        if let Some(max_year) = self.max_year {
            pairs.push(("max_year".to_string(), max_year.to_string()));
        }
        pairs
    }
}

/// Request body for POST /survey/submit (fire-and-forget)
#[derive(Debug, Clone, Serialize)]
pub struct SurveySubmission {
    pub user_id: i64,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

// ============================================================================
// Profile
// ============================================================================

/// A user's profile; the client holds a transient copy, never authoritative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Base64 data URL or image URL
    #[serde(default)]
    pub avatar_data_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub favorites: Vec<String>,
}

impl Profile {
    /// Default anonymous-looking profile used when the fetch degrades
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            name: None,
            avatar_data_url: None,
            genres: Vec::new(),
            favorites: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Adds a favorite title, keeping user order and suppressing duplicates
    pub fn add_favorite(&mut self, title: &str) {
        let title = title.trim();
        if title.is_empty() || self.favorites.iter().any(|f| f == title) {
            return;
        }
        self.favorites.push(title.to_string());
    }

    pub fn remove_favorite(&mut self, title: &str) {
        self.favorites.retain(|f| f != title);
    }

    /// Toggles a genre preference (set semantics)
    pub fn toggle_genre(&mut self, genre: &str) {
        if let Some(pos) = self.genres.iter().position(|g| g == genre) {
            self.genres.remove(pos);
        } else {
            self.genres.push(genre.to_string());
        }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

/// One recommended movie; an immutable snapshot for the lifetime of a feed load
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Recommendation {
    pub movie_id: i64,
    pub title: String,
    /// Pipe-joined genre string as sent by the backend, e.g. "Action|Sci-Fi"
    #[serde(default)]
    pub genres: String,
    pub predicted_rating: f64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub trailer_youtube_id: Option<String>,
}

impl Recommendation {
    /// Splits the wire genre string into ordered tags
    pub fn genre_tags(&self) -> Vec<&str> {
        self.genres.split('|').filter(|g| !g.is_empty()).collect()
    }

    pub fn has_trailer(&self) -> bool {
        self.trailer_youtube_id.is_some()
    }
}

/// Response from GET /recommend/{user_id}
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Movie detail
// ============================================================================

/// Full movie record for the detail view, fetched by id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub trailer_youtube_id: Option<String>,
    /// Streaming platform names carrying the title
    #[serde(default)]
    pub sources: Vec<String>,
    /// Platform name -> deep search URL, as built by the backend
    #[serde(default)]
    pub source_urls: HashMap<String, String>,
}

impl MovieDetail {
    /// (name, url) pairs in the backend's source order
    pub fn available_sources(&self) -> Vec<(&str, &str)> {
        self.sources
            .iter()
            .filter_map(|name| {
                self.source_urls
                    .get(name)
                    .map(|url| (name.as_str(), url.as_str()))
            })
            .collect()
    }
}

// ============================================================================
// Watchlist
// ============================================================================

/// One saved movie in a user's watchlist
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchlistEntry {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Response from GET /watchlist/{user_id}
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistResponse {
    #[serde(default)]
    pub watchlist: Vec<WatchlistEntry>,
}

/// Response from GET /watchlist/{user_id}/check/{movie_id}
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipResponse {
    pub in_watchlist: bool,
}

/// Image variant served by GET /image/{movie_id}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Hero,
    Poster,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Hero => "hero",
            ImageKind::Poster => "poster",
        }
    }
}
