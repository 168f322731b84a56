//! Standard session invariants.

use yaterm_core::ConnectionState;

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// Retained display text never exceeds the configured bound.
pub struct DisplayWithinBound;

impl Invariant for DisplayWithinBound {
    fn name(&self) -> &'static str {
        "DisplayWithinBound"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.display_len > state.max_display_chars {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} characters retained, bound is {}",
                    state.display_len, state.max_display_chars
                ),
            });
        }
        Ok(())
    }
}

/// The log length is the sum of its segment lengths.
pub struct SegmentAccounting;

impl Invariant for SegmentAccounting {
    fn name(&self) -> &'static str {
        "SegmentAccounting"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let total: usize = state.segment_chars.iter().sum();
        if total != state.display_len {
            return Err(Violation {
                invariant: self.name(),
                message: format!("segments hold {total} characters, log reports {}", state.display_len),
            });
        }
        Ok(())
    }
}

/// History never holds more lines than its capacity.
pub struct HistoryWithinBound;

impl Invariant for HistoryWithinBound {
    fn name(&self) -> &'static str {
        "HistoryWithinBound"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.history_len > state.history_capacity {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} entries, capacity {}",
                    state.history_len, state.history_capacity
                ),
            });
        }
        Ok(())
    }
}

/// History cursor is within `0..=len`.
pub struct HistoryCursorInRange;

impl Invariant for HistoryCursorInRange {
    fn name(&self) -> &'static str {
        "HistoryCursorInRange"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.history_cursor > state.history_len {
            return Err(Violation {
                invariant: self.name(),
                message: format!("cursor {} past length {}", state.history_cursor, state.history_len),
            });
        }
        Ok(())
    }
}

/// Partial EOM match is always a strict prefix of a non-empty EOM.
pub struct FramerIndexInRange;

impl Invariant for FramerIndexInRange {
    fn name(&self) -> &'static str {
        "FramerIndexInRange"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.eom_len == 0 || state.eom_index >= state.eom_len {
            return Err(Violation {
                invariant: self.name(),
                message: format!("index {} with EOM length {}", state.eom_index, state.eom_len),
            });
        }
        Ok(())
    }
}

/// The session is connected exactly when the transport has a port open.
pub struct ConnectionMatchesTransport;

impl Invariant for ConnectionMatchesTransport {
    fn name(&self) -> &'static str {
        "ConnectionMatchesTransport"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        let connected = state.state == ConnectionState::Connected;
        if connected != state.transport_open {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "state {:?} but transport open = {}",
                    state.state, state.transport_open
                ),
            });
        }
        Ok(())
    }
}
