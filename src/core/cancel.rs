//! Hierarchical cancellation flags.
//!
//! A binding owns one root token; its signal subscription and its scheduler
//! task each hold a child.  Cancelling the root silences both at once,
//! cancelling a child (restart, unsubscribe) leaves the root alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    parent: Option<CancelToken>,
}

/// Shared cancellation flag.  Raising it is synchronous and idempotent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<Inner>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is cancelled when either it or `self` is.
    pub fn child(&self) -> Self {
        Self(Arc::new(Inner {
            cancelled: AtomicBool::new(false),
            parent: Some(self.clone()),
        }))
    }

    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Acquire)
            || self.0.parent.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
