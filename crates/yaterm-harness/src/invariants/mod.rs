//! Invariant checking for deterministic session tests.
//!
//! Invariants are properties that must hold after every operation, whatever
//! sequence of input, inbound data and connection changes led there.
//!
//! # Architecture
//!
//! The observable state of a [`yaterm_core::Session`] is copied into a
//! [`SessionSnapshot`], then every registered [`Invariant`] checks it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SessionSnapshot::from_session(&session);
//! registry.assert_all(&snapshot, "after connect");
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ConnectionMatchesTransport, DisplayWithinBound, FramerIndexInRange, HistoryCursorInRange,
    HistoryWithinBound, SegmentAccounting,
};
pub use snapshot::SessionSnapshot;

use thiserror::Error;

/// Outcome of a single check.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant and what was observed.
#[derive(Debug, Clone, Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Observed values.
    pub message: String,
}

/// A property checked against a session snapshot.
pub trait Invariant: Send + Sync {
    /// Name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check the invariant against the snapshot.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Ordered set of invariants run together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every session invariant:
    ///
    /// - [`DisplayWithinBound`]: retained characters never exceed the bound
    /// - [`SegmentAccounting`]: segment lengths add up to the log length
    /// - [`HistoryWithinBound`]: history never exceeds its capacity
    /// - [`HistoryCursorInRange`]: cursor stays in `0..=len`
    /// - [`FramerIndexInRange`]: partial EOM match is a strict prefix
    /// - [`ConnectionMatchesTransport`]: connected exactly when the port is open
    pub fn standard() -> Self {
        let invariants: Vec<Box<dyn Invariant>> = vec![
            Box::new(DisplayWithinBound),
            Box::new(SegmentAccounting),
            Box::new(HistoryWithinBound),
            Box::new(HistoryCursorInRange),
            Box::new(FramerIndexInRange),
            Box::new(ConnectionMatchesTransport),
        ];
        Self { invariants }
    }

    /// Register one more invariant, checked after the existing ones.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Run every invariant and collect all violations, in registration order.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Like [`check_all`](Self::check_all) but panics, listing every
    /// violation under `context`.
    #[allow(clippy::panic, reason = "test assertion helper")]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        let Err(violations) = self.check_all(state) else {
            return;
        };
        let report = violations.iter().fold(String::new(), |mut report, violation| {
            report.push_str("\n  ");
            report.push_str(&violation.to_string());
            report
        });
        panic!("Invariant violation {context}:{report}");
    }

    /// Names of the registered invariants.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.invariants.iter().map(|inv| inv.name())
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_runs_every_check() {
        let names: Vec<_> = InvariantRegistry::standard().names().collect();
        assert_eq!(names, [
            "DisplayWithinBound",
            "SegmentAccounting",
            "HistoryWithinBound",
            "HistoryCursorInRange",
            "FramerIndexInRange",
            "ConnectionMatchesTransport",
        ]);
        assert!(InvariantRegistry::new().is_empty());
    }

    #[test]
    fn default_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&SessionSnapshot::default()).is_ok());
    }

    #[test]
    fn reports_every_violation() {
        let registry = InvariantRegistry::standard();
        let snapshot = SessionSnapshot {
            display_len: 11,
            max_display_chars: 10,
            segment_chars: vec![11],
            history_len: 3,
            history_cursor: 4,
            history_capacity: 64,
            ..SessionSnapshot::default()
        };

        let violations = registry.check_all(&snapshot).unwrap_err();
        let names: Vec<_> = violations.iter().map(|v| v.invariant).collect();
        assert_eq!(names, vec!["DisplayWithinBound", "HistoryCursorInRange"]);
    }
}
