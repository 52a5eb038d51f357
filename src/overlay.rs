/// Trailer overlay controller
///
/// Singleton modal: at most one overlay is open across the application.
/// Opening acquires the background scroll lock, closing releases it, and the
/// release is guaranteed on every exit path; dropping the controller (for
/// example on navigation teardown) releases a still-held lock.
use std::sync::{Arc, Mutex};

/// Host hook for locking background scrolling while the overlay is open
pub trait ScrollLock: Send + Sync {
    fn acquire(&self);
    fn release(&self);
}

/// For headless hosts and tests
#[derive(Debug, Default)]
pub struct NoopScrollLock;

impl ScrollLock for NoopScrollLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Inputs the overlay reacts to while open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayInput {
    /// Cancellation key
    EscapeKey,
    /// Click outside the embedded player
    BackdropClick,
    /// Click inside the player; does not close
    PlayerClick,
}

struct OverlayInner {
    scroll: Arc<dyn ScrollLock>,
    open_trailer: Option<String>,
}

impl OverlayInner {
    fn close(&mut self) {
        if self.open_trailer.take().is_some() {
            self.scroll.release();
        }
    }
}

impl Drop for OverlayInner {
    fn drop(&mut self) {
        // Teardown without an explicit close still restores scrolling
        self.close();
    }
}

#[derive(Clone)]
pub struct TrailerOverlay {
    inner: Arc<Mutex<OverlayInner>>,
}

impl TrailerOverlay {
    pub fn new(scroll: Arc<dyn ScrollLock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(OverlayInner {
                scroll,
                open_trailer: None,
            })),
        }
    }

    /// Overlay with no real scroll lock, for headless use
    pub fn new_unlocked() -> Self {
        Self::new(Arc::new(NoopScrollLock))
    }

    /// Opens the overlay for a trailer, replacing any currently open one
    ///
    /// The scroll lock is acquired once and held until the last close.
    pub fn open(&self, trailer_ref: &str) {
        let mut inner = self.inner.lock().expect("overlay lock poisoned");
        if inner.open_trailer.is_none() {
            inner.scroll.acquire();
        }
        tracing::debug!(trailer = %trailer_ref, "Trailer overlay opened");
        inner.open_trailer = Some(trailer_ref.to_string());
    }

    pub fn close(&self) {
        self.inner.lock().expect("overlay lock poisoned").close();
    }

    /// Routes a user input; returns true if the overlay closed because of it
    pub fn handle_input(&self, input: OverlayInput) -> bool {
        let mut inner = self.inner.lock().expect("overlay lock poisoned");
        if inner.open_trailer.is_none() {
            return false;
        }
        match input {
            OverlayInput::EscapeKey | OverlayInput::BackdropClick => {
                inner.close();
                true
            }
            OverlayInput::PlayerClick => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner
            .lock()
            .expect("overlay lock poisoned")
            .open_trailer
            .is_some()
    }

    pub fn current_trailer(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("overlay lock poisoned")
            .open_trailer
            .clone()
    }
}
