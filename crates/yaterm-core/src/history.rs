//! Input history ring with shell-style browsing.

use std::collections::VecDeque;

/// Default number of remembered lines.
pub const DEFAULT_HISTORY_LEN: usize = 64;

/// Bounded list of submitted lines plus a browsing cursor.
///
/// The cursor ranges over `0..=len`. `len` is the "not browsing" position,
/// i.e. a blank line after the newest entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl History {
    /// Create an empty ring holding at most `capacity` lines (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity, cursor: 0 }
    }

    /// Remember a submitted line, evicting the oldest past capacity.
    pub fn record(&mut self, line: impl Into<String>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
        self.reset_cursor();
    }

    /// Step back one entry. Stops at the oldest.
    ///
    /// Returns `None` only when the ring is empty.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward one entry.
    ///
    /// Returns `None` on reaching the "not browsing" position.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&str> {
        let next = self.cursor.saturating_add(1);
        if next >= self.entries.len() {
            self.cursor = self.entries.len();
            return None;
        }

        self.cursor = next;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Return to the "not browsing" position.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Current cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of remembered lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of remembered lines.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_on_empty_ring() {
        let mut history = History::default();
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), None);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn browse_back_and_forth() {
        let mut history = History::default();
        history.record("one");
        history.record("two");
        history.record("three");

        assert_eq!(history.previous(), Some("three"));
        assert_eq!(history.previous(), Some("two"));
        assert_eq!(history.previous(), Some("one"));
        assert_eq!(history.previous(), Some("one"));

        assert_eq!(history.next(), Some("two"));
        assert_eq!(history.next(), Some("three"));
        assert_eq!(history.next(), None);
        assert_eq!(history.cursor(), 3);
        assert_eq!(history.next(), None);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn single_entry_round_trip() {
        let mut history = History::default();
        history.record("only");

        assert_eq!(history.previous(), Some("only"));
        assert_eq!(history.next(), None);
        assert_eq!(history.cursor(), history.len());
    }

    #[test]
    fn record_resets_cursor() {
        let mut history = History::default();
        history.record("a");
        history.record("b");
        history.previous();
        history.previous();
        assert_eq!(history.cursor(), 0);

        history.record("c");
        assert_eq!(history.cursor(), 3);
        assert_eq!(history.previous(), Some("c"));
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut history = History::new(3);
        for line in ["1", "2", "3", "4", "5"] {
            history.record(line);
        }

        assert_eq!(history.iter().collect::<Vec<_>>(), vec!["3", "4", "5"]);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = History::new(0);
        history.record("a");
        history.record("b");

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.get(0), Some("b"));
    }
}
