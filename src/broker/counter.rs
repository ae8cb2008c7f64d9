//! Process-wide message id generator.
//!
//! One counter is shared by every topic, so ids form a single total order
//! across the whole broker. Ids start at 1 and are never reused.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct MessageCounter {
    last: AtomicU64,
}

impl MessageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter and return the new value.
    pub fn next_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last id handed out, `0` if none yet.
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}
