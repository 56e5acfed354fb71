use std::collections::HashMap;

use time::{Duration, OffsetDateTime};

/// Span during which an identical (message, category) pair is accepted once.
pub const SUPPRESSION_WINDOW: Duration = Duration::SECOND;

/// Ledger size above which stale entries are swept.
pub const LEDGER_SWEEP_THRESHOLD: usize = 100;

/// Records when each (message, category) pair was last accepted.
///
/// Memory is bounded by an opportunistic sweep: once the ledger holds more
/// than [`LEDGER_SWEEP_THRESHOLD`] entries, every entry older than twice the
/// window is dropped. There is no timer; the sweep runs inside
/// [`is_duplicate`](Self::is_duplicate).
#[derive(Clone, Debug)]
pub struct DuplicateLedger {
    window: Duration,
    accepted: HashMap<(String, String), OffsetDateTime>,
}

impl DuplicateLedger {
    /// Ledger using [`SUPPRESSION_WINDOW`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(SUPPRESSION_WINDOW)
    }

    /// Ledger using a custom window.
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            accepted: HashMap::new(),
        }
    }

    /// Suppression window in force.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Number of tracked pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Reports whether no pair is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Reports whether `message` in `category` was accepted less than one
    /// window before `now`.
    ///
    /// When it was not, the pair is recorded as accepted at `now`. A missing
    /// category is keyed as the empty string.
    pub fn is_duplicate(
        &mut self,
        message: &str,
        category: Option<&str>,
        now: OffsetDateTime,
    ) -> bool {
        let key = (message.to_owned(), category.unwrap_or_default().to_owned());

        if let Some(last) = self.accepted.get(&key) {
            // A clock that stepped backwards yields a negative span; the pair
            // is then accepted and its entry moved to `now`.
            let elapsed = now - *last;
            if elapsed >= Duration::ZERO && elapsed < self.window {
                return true;
            }
        }

        self.accepted.insert(key, now);
        if self.accepted.len() > LEDGER_SWEEP_THRESHOLD {
            self.sweep(now);
        }
        false
    }

    /// Forgets every pair.
    pub fn clear(&mut self) {
        self.accepted.clear();
    }

    fn sweep(&mut self, now: OffsetDateTime) {
        let horizon = self.window * 2_i32;
        self.accepted
            .retain(|_, accepted| (Duration::ZERO..=horizon).contains(&(now - *accepted)));
    }
}

impl Default for DuplicateLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::milliseconds(millis)
    }

    #[test]
    fn repeat_within_window_is_duplicate() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("boot", None, at(0)));
        assert!(ledger.is_duplicate("boot", None, at(999)));
    }

    #[test]
    fn repeat_after_window_is_accepted() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("boot", None, at(0)));
        assert!(!ledger.is_duplicate("boot", None, at(1000)));
        assert!(!ledger.is_duplicate("boot", None, at(2500)));
    }

    #[test]
    fn duplicates_do_not_refresh_the_entry() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("tick", None, at(0)));
        assert!(ledger.is_duplicate("tick", None, at(600)));
        assert!(!ledger.is_duplicate("tick", None, at(1100)));
    }

    #[test]
    fn categories_are_distinct_keys() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("ready", Some("net"), at(0)));
        assert!(!ledger.is_duplicate("ready", Some("db"), at(1)));
        assert!(!ledger.is_duplicate("ready", None, at(2)));
        assert!(ledger.is_duplicate("ready", Some("net"), at(3)));
    }

    #[test]
    fn missing_category_matches_empty_category() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("ready", None, at(0)));
        assert!(ledger.is_duplicate("ready", Some(""), at(1)));
    }

    #[test]
    fn sweep_runs_only_above_threshold() {
        let mut ledger = DuplicateLedger::new();
        for index in 0..LEDGER_SWEEP_THRESHOLD {
            assert!(!ledger.is_duplicate(&format!("m{index}"), None, at(0)));
        }
        assert_eq!(ledger.len(), LEDGER_SWEEP_THRESHOLD);

        // Stale but not yet swept: the ledger is not over the threshold.
        assert!(!ledger.is_duplicate("m0", None, at(5000)));
        assert_eq!(ledger.len(), LEDGER_SWEEP_THRESHOLD);

        // One more entry crosses the threshold and evicts everything older
        // than two windows.
        assert!(!ledger.is_duplicate("fresh", None, at(5000)));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn sweep_keeps_recent_entries() {
        let mut ledger = DuplicateLedger::new();
        for index in 0..=LEDGER_SWEEP_THRESHOLD {
            assert!(!ledger.is_duplicate(&format!("m{index}"), None, at(1500)));
        }
        assert_eq!(ledger.len(), LEDGER_SWEEP_THRESHOLD + 1);
    }

    #[test]
    fn backwards_clock_step_is_not_a_duplicate() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("tick", None, at(7_200_000)));
        assert!(!ledger.is_duplicate("tick", None, at(3_600_000)));
        // The entry now sits at the earlier instant.
        assert!(ledger.is_duplicate("tick", None, at(3_600_500)));
        assert!(!ledger.is_duplicate("tick", None, at(3_601_000)));
    }

    #[test]
    fn sweep_drops_entries_from_the_future() {
        let mut ledger = DuplicateLedger::new();
        assert!(!ledger.is_duplicate("ahead", None, at(10_000)));
        for index in 0..LEDGER_SWEEP_THRESHOLD {
            assert!(!ledger.is_duplicate(&format!("m{index}"), None, at(0)));
        }
        // Crossing the threshold swept the entry stamped ahead of `now`.
        assert_eq!(ledger.len(), LEDGER_SWEEP_THRESHOLD);
        assert!(!ledger.is_duplicate("ahead", None, at(10_500)));
    }

    #[test]
    fn custom_window_is_honoured() {
        let mut ledger = DuplicateLedger::with_window(Duration::milliseconds(10));
        assert_eq!(ledger.window(), Duration::milliseconds(10));
        assert!(!ledger.is_duplicate("x", None, at(0)));
        assert!(ledger.is_duplicate("x", None, at(9)));
        assert!(!ledger.is_duplicate("x", None, at(10)));
    }
}
