/// Race-safe fetch application
///
/// Wraps request-issuing futures with a generation token so results that
/// arrive after the operation was superseded (a newer load started, or the
/// owning view was torn down) are silently discarded. Cancellation is
/// logical: the underlying call still runs to completion, only its result
/// is dropped.
use std::future::Future;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Generation counter scoped to one view instance
///
/// Clones share the counter, so a coordinator can hand tickets to spawned
/// work while keeping the ability to invalidate them on teardown.
#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    generation: Arc<AtomicU64>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new invocation, marking every earlier ticket stale
    pub fn begin(&self) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket {
            guard: self.clone(),
            generation,
        }
    }

    /// View teardown: all outstanding tickets become permanently stale
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Awaits `work` under a fresh ticket and returns its output, paired
    /// with the ticket, only if no newer invocation or teardown happened in
    /// the meantime.
    ///
    /// The returned ticket can still go stale between this return and the
    /// caller's state update; callers must re-check `is_current` after
    /// acquiring their state lock, with no await point in between.
    ///
    /// Joined fetches run their member calls inside one future (for example
    /// with `tokio::join!`) so the joined result is applied atomically.
    pub async fn run<T, F>(&self, work: F) -> Option<(T, FetchTicket)>
    where
        F: Future<Output = T>,
    {
        let ticket = self.begin();
        let output = work.await;
        if ticket.is_current() {
            Some((output, ticket))
        } else {
            tracing::debug!(generation = ticket.generation, "Dropping stale fetch result");
            None
        }
    }
}

/// Stamp for one guarded invocation
#[derive(Debug, Clone)]
pub struct FetchTicket {
    guard: FetchGuard,
    generation: u64,
}

impl FetchTicket {
    /// True iff this is still the most recently started invocation
    pub fn is_current(&self) -> bool {
        self.guard.generation.load(Ordering::SeqCst) == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_current_result_is_applied() {
        let guard = FetchGuard::new();
        let (value, ticket) = guard.run(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
        assert!(ticket.is_current());
    }

    #[tokio::test]
    async fn test_returned_ticket_goes_stale_before_apply() {
        let guard = FetchGuard::new();
        let (value, ticket) = guard.run(async { 1 }).await.unwrap();
        assert_eq!(value, 1);

        // A newer load starts between the fetch completing and the apply;
        // the re-check under the caller's state lock must reject the result
        guard.begin();
        assert!(!ticket.is_current());
    }

    #[tokio::test]
    async fn test_superseded_result_is_dropped() {
        let guard = FetchGuard::new();
        let (tx, rx) = oneshot::channel::<i32>();

        let slow = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.run(async { rx.await.unwrap() }).await })
        };

        // A newer invocation starts while the first is still outstanding
        tokio::task::yield_now().await;
        let fresh = guard.run(async { 2 }).await;
        assert_eq!(fresh.map(|(value, _)| value), Some(2));

        tx.send(1).unwrap();
        assert!(slow.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_teardown_makes_pending_stale() {
        let guard = FetchGuard::new();
        let (tx, rx) = oneshot::channel::<i32>();

        let pending = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.run(async { rx.await.unwrap() }).await })
        };

        tokio::task::yield_now().await;
        guard.invalidate();

        tx.send(7).unwrap();
        assert!(pending.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ticket_tracks_latest_generation() {
        let guard = FetchGuard::new();
        let first = guard.begin();
        assert!(first.is_current());

        let second = guard.begin();
        assert!(!first.is_current());
        assert!(second.is_current());

        guard.invalidate();
        assert!(!second.is_current());
    }
}
