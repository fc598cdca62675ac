//! Time source for auction deadlines.
//!
//! The engine never keeps its own timers: all timing is governed by the
//! external market's `end_time`, compared against a [`Clock`].

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};

/// Seconds since the UNIX epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;

    /// [`Clock::now`] as a timestamp. Out-of-range values collapse to the epoch.
    fn now_utc(&self) -> DateTime<Utc> {
        i64::try_from(self.now())
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_default()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock that only moves when told to. Clones share the same time, so a
/// simulated market and the engine observe identical instants.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Move time forward, like `evm_increaseTime`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now(), 150);
        other.set(7);
        assert_eq!(clock.now(), 7);
    }

    #[test]
    fn manual_clock_timestamp_matches_seconds() {
        let clock = ManualClock::new(1_700_000_000);
        assert_eq!(clock.now_utc().timestamp(), 1_700_000_000);
        clock.set(u64::MAX);
        assert_eq!(clock.now_utc().timestamp(), 0);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
