//! Request spacing for rate-limited upstream APIs.
//!
//! Crossref's usage policy is a global limit, so a single [`RateGate`] is
//! shared by every lookup in a resolution pass instead of sleeping per record.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Enforces an idle interval after each request.
///
/// The interval starts when a request finishes, not when it starts, so a
/// slow or timed-out request never eats into the pause before the next one.
/// Callers are expected to be sequential: acquire, send, drop the permit.
#[derive(Clone)]
pub struct RateGate {
    interval: Duration,
    last_finished: Arc<Mutex<Option<Instant>>>,
    admitted: Arc<AtomicU64>,
}

impl RateGate {
    /// Create a gate; a zero interval disables waiting.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_finished: Arc::new(Mutex::new(None)),
            admitted: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait until `interval` has passed since the previous request finished.
    ///
    /// The returned permit marks the request as finished when dropped.
    pub async fn acquire(&self) -> GatePermit {
        let ready_at = self.lock_last().map(|finished| finished + self.interval);
        if let Some(ready_at) = ready_at {
            tokio::time::sleep_until(ready_at).await;
        }
        self.admitted.fetch_add(1, Ordering::Relaxed);
        GatePermit { last_finished: Arc::clone(&self.last_finished) }
    }

    /// Number of requests admitted so far.
    #[must_use]
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    fn lock_last(&self) -> Option<Instant> {
        *self.last_finished.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RateGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGate")
            .field("interval", &self.interval)
            .field("admitted", &self.admitted())
            .finish()
    }
}

/// An admitted request; dropping it starts the next interval.
#[derive(Debug)]
#[must_use = "dropping the permit immediately ends the request"]
pub struct GatePermit {
    last_finished: Arc<Mutex<Option<Instant>>>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        *self.last_finished.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }
}
