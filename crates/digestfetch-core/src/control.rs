//! Cancellation for in-flight fetches.
//!
//! A `CancelToken` is shared between the fetch and whoever may want to stop
//! it (e.g. a Ctrl-C handler). The transfer polls the token from curl's
//! progress callback and aborts; the fetch then reports
//! [`FetchError::Cancelled`](crate::fetch::FetchError::Cancelled).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; visible to every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
