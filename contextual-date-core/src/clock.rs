//! Clock capability and the bounded-staleness "now" cache
//!
//! Sibling calls made within a short burst (rendering a table of dates, for
//! instance) should agree on what "now" is. [`NowCache`] keeps the last clock
//! reading and hands it back until it is older than the staleness budget.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// Capability supplying the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hand one clone to
/// an engine and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// Move forward (or backward, for a negative delta).
    pub fn advance(&self, delta: Duration) {
        let mut current = self.lock();
        *current += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

/// The cached reading.
#[derive(Debug, Clone, Copy)]
struct NowEntry {
    instant: DateTime<Utc>,
}

/// Last-read "now" plus the refresh policy.
///
/// The read-or-refresh step runs under one lock, so a shared engine still
/// performs at most one refresh per staleness window.
#[derive(Debug, Default)]
pub struct NowCache {
    entry: Mutex<Option<NowEntry>>,
}

impl NowCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<NowEntry>> {
        self.entry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached instant, or a fresh reading when there is none or
    /// the cached one is more than `budget_ms` old.
    pub fn now(&self, clock: &dyn Clock, budget_ms: u64) -> DateTime<Utc> {
        let mut entry = self.lock();
        let wall = clock.now();

        if let Some(cached) = *entry {
            let age_ms = (wall - cached.instant).num_milliseconds();
            // A clock that moved backwards yields a negative age and keeps the entry.
            if age_ms <= budget_ms.min(i64::MAX as u64) as i64 {
                return cached.instant;
            }
            tracing::debug!(age_ms, budget_ms, "Cached now is stale; refreshing");
        }

        *entry = Some(NowEntry { instant: wall });
        wall
    }

    /// Drop the cached reading so the next [`NowCache::now`] reads the clock.
    pub fn invalidate(&self) {
        let mut entry = self.lock();
        if entry.take().is_some() {
            tracing::debug!("Invalidated cached now");
        }
    }
}
