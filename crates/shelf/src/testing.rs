//! Test utilities for the shelf - deterministic clocks and fixtures
//!
//! LRU eviction depends on `last_accessed` ordering, which is awkward to
//! control with the wall clock. `ManualClock` lets tests pin and advance time
//! explicitly.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::clock::Clock;

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can hand one clone to a
/// shelf and keep another to advance it.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jump to an absolute time
    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Default for ManualClock {
    /// Starts at 2024-01-01T00:00:00Z
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(start)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Content string whose approximate cost is exactly `tokens` under the
/// default 4:1 character ratio.
pub fn content_of_size(tokens: usize) -> String {
    "x".repeat(tokens * 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_stable_until_advanced() {
        let clock = ManualClock::default();
        let t1 = clock.now();
        let t2 = clock.now();
        assert_eq!(t1, t2);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();
        let before = clock.now();

        handle.advance(Duration::seconds(30));

        assert_eq!(clock.now() - before, Duration::seconds(30));
    }

    #[test]
    fn manual_clock_set_jumps() {
        let clock = ManualClock::default();
        let target = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn content_of_size_matches_default_cost() {
        use crate::cost::{CharRatioCost, CostModel};
        let cost = CharRatioCost::default();
        assert_eq!(cost.estimate(&content_of_size(10)), 10);
        assert_eq!(cost.estimate(&content_of_size(1)), 1);
    }
}
