//! Quiet-period debouncing for the search input.
//!
//! Every keystroke arms the timer anew; only the trigger that survives the
//! full quiet period untouched proceeds. This cancels pending *timers*, not
//! in-flight requests; those are sequence-guarded by the query controller.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::time::Duration;

/// Quiet period for search keystrokes.
pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(350);

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            latest: AtomicU64::new(0),
        }
    }

    /// Debouncer tuned for search input.
    pub fn search() -> Self {
        Self::new(SEARCH_QUIET_PERIOD)
    }

    /// Arm the timer and wait out the quiet period. Returns `false` when a
    /// newer trigger superseded this one while it slept.
    pub async fn trigger(&self) -> bool {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.quiet).await;
        token == self.latest.load(Ordering::SeqCst)
    }
}
