//! Minimum spacing between request dispatches.

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Admits one request at a time, at least `min_interval` after the previous
/// admission on the same limiter.
///
/// The check, the wait and the new timestamp all happen under one lock, so
/// concurrent callers can never both measure against the same stale
/// timestamp. The lock is FIFO, so every waiter is eventually admitted.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the interval since the previous admission has elapsed,
    /// records the admission and returns its timestamp.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_dispatch.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?} before next request", wait);
                tokio::time::sleep(wait).await;
            }
        }

        let now = Instant::now();
        *last = Some(now);
        now
    }
}
