/// View data coordinators
///
/// Each coordinator owns one view's fetching and derived state: it composes
/// guarded backend calls, merges the results into a view model, and exposes
/// loading/error/ready states. View models are owned exclusively by their
/// coordinator and never mutated by another component.
pub mod detail;
pub mod feed;
pub mod profile;
pub mod survey;
pub mod watchlist;

pub use detail::MovieDetailCoordinator;
pub use feed::{FeedCoordinator, FeedView};
pub use profile::{ProfileCoordinator, ProfileView};
pub use survey::SurveyCoordinator;
pub use watchlist::WatchlistCoordinator;

/// Lifecycle of one view's data
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    /// Terminal for the view; retry is a new user-initiated navigation
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ViewState::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
