use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trailing-edge debounce keyed on a generation counter.
///
/// Each call to [`Debouncer::settle`] starts a new generation and waits out
/// the quiet period; it reports `true` only if no newer call arrived in the
/// meantime. Work started after a `true` is never interrupted.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn settle(&self) -> bool {
        let mine = self.supersede();
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::Acquire) == mine
    }

    /// Invalidate any pending wait without starting a new one.
    pub fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}
