//! Cancellation registry for in-flight loads
//!
//! A `CancelBag` owns the cancellation tokens of one logical request. The
//! bag is cloned into the `Loadable::IsLoading` slot it belongs to, so whoever
//! can see the slot can cancel the work behind it.
//!
//! Dropping a bag never cancels anything. Cancellation is always explicit.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct BagInner {
    tokens: Vec<CancellationToken>,
    cancelled: bool,
}

/// Shared container of cancellation tokens
#[derive(Clone, Default)]
pub struct CancelBag {
    inner: Arc<Mutex<BagInner>>,
}

impl CancelBag {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token. Several tokens may live in the same bag when one
    /// request fans out into sub-operations.
    pub fn register(&self, token: CancellationToken) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.tokens.push(token);
    }

    /// Create a fresh token, register it and hand it back to the caller
    pub fn token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        self.register(token.clone());
        token
    }

    /// Cancel every registered token and clear the bag.
    ///
    /// Calling this a second time finds an empty bag and does nothing.
    pub fn cancel(&self) {
        let tokens = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.cancelled = true;
            std::mem::take(&mut inner.tokens)
        };

        if !tokens.is_empty() {
            tracing::debug!("Cancelling {} in-flight operation(s)", tokens.len());
        }
        for token in tokens {
            token.cancel();
        }
    }

    /// Whether `cancel` has been called on this bag
    pub fn is_cancelled(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancelled
    }

    /// Number of tokens currently held
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tokens
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for CancelBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelBag")
            .field("tokens", &self.len())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
