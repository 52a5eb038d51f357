/// Watchlist membership controller
///
/// Per-movie membership cache plus the toggle protocol. Local state is only
/// ever mutated as a direct consequence of a successful server confirmation
/// (of the initial check or of a toggle), never speculatively. Check and
/// toggle failures are swallowed: watchlist membership is a non-critical
/// action and fails quiet.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{api::MovieBackend, session::SessionStore};

/// Confirmed membership state of one movie card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    #[default]
    Unknown,
    Checking,
    Member,
    NonMember,
}

#[derive(Debug, Clone, Copy, Default)]
struct CardState {
    membership: Membership,
    /// Serializes toggles per movie; while set, further toggles are no-ops
    updating: bool,
}

#[derive(Clone)]
pub struct MembershipController {
    backend: Arc<dyn MovieBackend>,
    sessions: SessionStore,
    cards: Arc<RwLock<HashMap<i64, CardState>>>,
}

impl MembershipController {
    pub fn new(backend: Arc<dyn MovieBackend>, sessions: SessionStore) -> Self {
        Self {
            backend,
            sessions,
            cards: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn membership(&self, movie_id: i64) -> Membership {
        self.cards
            .read()
            .await
            .get(&movie_id)
            .map(|c| c.membership)
            .unwrap_or_default()
    }

    pub async fn is_updating(&self, movie_id: i64) -> bool {
        self.cards
            .read()
            .await
            .get(&movie_id)
            .map(|c| c.updating)
            .unwrap_or(false)
    }

    /// Lazy per-card membership check
    ///
    /// Each displayed card queries independently; there is no batching or
    /// cross-card deduplication. A failed check does not take effect: the
    /// card keeps whatever state was last confirmed. Returns the resulting
    /// state.
    pub async fn check(&self, movie_id: i64) -> Membership {
        let Some(user_id) = self.sessions.user_id().await else {
            return Membership::Unknown;
        };

        let prior = {
            let mut cards = self.cards.write().await;
            let card = cards.entry(movie_id).or_default();
            // Already in flight or mid-toggle; let that operation conclude
            if card.membership == Membership::Checking || card.updating {
                return card.membership;
            }
            let prior = card.membership;
            card.membership = Membership::Checking;
            prior
        };

        let confirmed = self.backend.check_membership(user_id, movie_id).await;

        let mut cards = self.cards.write().await;
        let card = cards.entry(movie_id).or_default();
        card.membership = match confirmed {
            Ok(true) => Membership::Member,
            Ok(false) => Membership::NonMember,
            Err(e) => {
                tracing::debug!(movie_id = movie_id, error = %e, "Membership check dropped");
                prior
            }
        };
        card.membership
    }

    /// Toggles membership based on the last confirmed state
    ///
    /// No-op while a toggle is in flight for this movie, without a session,
    /// or before the first confirmation; the add/remove decision is never an
    /// optimistic guess. Returns true iff the server confirmed a flip.
    pub async fn toggle(&self, movie_id: i64) -> bool {
        let Some(user_id) = self.sessions.user_id().await else {
            return false;
        };

        // Single critical section for the check-and-set, so rapid repeated
        // activation produces at most one in-flight mutation per movie.
        let confirmed = {
            let mut cards = self.cards.write().await;
            let card = cards.entry(movie_id).or_default();
            if card.updating {
                return false;
            }
            match card.membership {
                Membership::Member | Membership::NonMember => {
                    card.updating = true;
                    card.membership
                }
                _ => return false,
            }
        };

        let result = match confirmed {
            Membership::Member => self.backend.remove_from_watchlist(user_id, movie_id).await,
            _ => self.backend.add_to_watchlist(user_id, movie_id).await,
        };

        let mut cards = self.cards.write().await;
        let card = cards.entry(movie_id).or_default();
        card.updating = false;
        match result {
            Ok(()) => {
                card.membership = match confirmed {
                    Membership::Member => Membership::NonMember,
                    _ => Membership::Member,
                };
                true
            }
            Err(e) => {
                // Fail quiet: confirmed state stays as it was
                tracing::debug!(movie_id = movie_id, error = %e, "Watchlist toggle dropped");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMovieBackend;
    use crate::error::AppError;

    async fn signed_in_store(name: &str) -> SessionStore {
        let store = SessionStore::open(
            std::env::temp_dir().join(format!("movai_member_{}_{}.json", name, std::process::id())),
        );
        store.set(1, "t".to_string()).await.unwrap();
        store
    }

    async fn cleanup(store: &SessionStore) {
        store.clear().await.ok();
    }

    #[tokio::test]
    async fn test_check_confirms_membership() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .returning(|_, movie_id| Ok(movie_id == 5));

        let sessions = signed_in_store("check").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        assert_eq!(controller.membership(5).await, Membership::Unknown);
        assert_eq!(controller.check(5).await, Membership::Member);
        assert_eq!(controller.check(7).await, Membership::NonMember);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_check_failure_leaves_unknown() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .returning(|_, _| Err(AppError::Api { status: 500, message: "boom".to_string() }));

        let sessions = signed_in_store("check_fail").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        assert_eq!(controller.check(5).await, Membership::Unknown);
        assert_eq!(controller.membership(5).await, Membership::Unknown);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_failed_recheck_keeps_confirmed_state() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .times(1)
            .returning(|_, _| Ok(true));
        backend
            .expect_check_membership()
            .times(1)
            .returning(|_, _| Err(AppError::Api { status: 500, message: "boom".to_string() }));

        let sessions = signed_in_store("recheck_fail").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        assert_eq!(controller.check(5).await, Membership::Member);
        // The failed re-check does not take effect
        assert_eq!(controller.check(5).await, Membership::Member);
        assert_eq!(controller.membership(5).await, Membership::Member);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_check_without_session_is_noop() {
        let mut backend = MockMovieBackend::new();
        backend.expect_check_membership().times(0);

        let sessions = SessionStore::open(
            std::env::temp_dir().join(format!("movai_member_anon_{}.json", std::process::id())),
        );
        let controller = MembershipController::new(Arc::new(backend), sessions);

        assert_eq!(controller.check(5).await, Membership::Unknown);
    }

    #[tokio::test]
    async fn test_toggle_requires_confirmed_state() {
        let mut backend = MockMovieBackend::new();
        backend.expect_add_to_watchlist().times(0);
        backend.expect_remove_from_watchlist().times(0);

        let sessions = signed_in_store("toggle_unknown").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        // Never checked: membership is an assumption we refuse to act on
        assert!(!controller.toggle(5).await);
        assert_eq!(controller.membership(5).await, Membership::Unknown);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_toggle_adds_for_nonmember_and_flips() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .returning(|_, _| Ok(false));
        backend
            .expect_add_to_watchlist()
            .times(1)
            .returning(|_, _| Ok(()));

        let sessions = signed_in_store("toggle_add").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        controller.check(5).await;
        assert!(controller.toggle(5).await);
        assert_eq!(controller.membership(5).await, Membership::Member);
        assert!(!controller.is_updating(5).await);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_toggle_removes_for_member() {
        let mut backend = MockMovieBackend::new();
        backend.expect_check_membership().returning(|_, _| Ok(true));
        backend
            .expect_remove_from_watchlist()
            .times(1)
            .returning(|_, _| Ok(()));

        let sessions = signed_in_store("toggle_remove").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        controller.check(5).await;
        assert!(controller.toggle(5).await);
        assert_eq!(controller.membership(5).await, Membership::NonMember);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_confirmed_state() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .returning(|_, _| Ok(false));
        backend
            .expect_add_to_watchlist()
            .times(1)
            .returning(|_, _| Err(AppError::Api { status: 500, message: "boom".to_string() }));

        let sessions = signed_in_store("toggle_fail").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        controller.check(5).await;
        assert!(!controller.toggle(5).await);
        // Unchanged, and the updating flag was released for a later retry
        assert_eq!(controller.membership(5).await, Membership::NonMember);
        assert!(!controller.is_updating(5).await);

        cleanup(&sessions).await;
    }

    #[tokio::test]
    async fn test_toggle_without_session_is_noop() {
        let mut backend = MockMovieBackend::new();
        backend.expect_add_to_watchlist().times(0);

        let sessions = SessionStore::open(
            std::env::temp_dir().join(format!("movai_member_toggle_anon_{}.json", std::process::id())),
        );
        let controller = MembershipController::new(Arc::new(backend), sessions);

        assert!(!controller.toggle(5).await);
    }

    #[tokio::test]
    async fn test_cards_are_independent() {
        let mut backend = MockMovieBackend::new();
        backend
            .expect_check_membership()
            .returning(|_, movie_id| Ok(movie_id == 5));
        backend
            .expect_add_to_watchlist()
            .times(1)
            .returning(|_, _| Ok(()));

        let sessions = signed_in_store("independent").await;
        let controller = MembershipController::new(Arc::new(backend), sessions.clone());

        controller.check(5).await;
        controller.check(7).await;
        controller.toggle(7).await;

        assert_eq!(controller.membership(5).await, Membership::Member);
        assert_eq!(controller.membership(7).await, Membership::Member);

        cleanup(&sessions).await;
    }
}
