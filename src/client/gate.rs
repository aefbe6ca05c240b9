//! Shared minimum-interval gate for outbound requests
//!
//! Every request path holds an `Arc<RateGate>`. Waiters queue on a tokio
//! `Mutex`, which hands out the lock in FIFO order, so no caller starves no
//! matter how many workers share the gate.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Grants at most one permit per `interval` across all callers
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,

    /// Instant of the most recent grant (None until the first request)
    last_grant: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Creates a gate that spaces permits at least `interval` apart
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Returns the configured minimum spacing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits for this caller's turn and returns the instant it was granted
    ///
    /// The lock is held across the sleep so the next waiter measures its slot
    /// from this grant, never from a stale one. An idle gate grants immediately.
    pub async fn acquire(&self) -> Instant {
        let mut last = self.last_grant.lock().await;

        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.interval).await;
        }

        let granted = Instant::now();
        *last = Some(granted);
        granted
    }
}
