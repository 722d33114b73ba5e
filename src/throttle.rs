//! Minimum spacing between outbound provider requests.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Default spacing between two provider requests.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(300);

/// Enforces at least `interval` between consecutive [`Throttle::acquire`]
/// returns.
///
/// The baseline lives behind an async mutex, so concurrent callers queue in
/// call order and the spacing holds even if the throttle is shared.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspends until `interval` has passed since the previous acquire
    /// returned, then records now as the new baseline.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(previous) = *last_request {
            sleep_until(previous + self.interval).await;
        }
        *last_request = Some(Instant::now());
    }
}
