//! Observable state snapshots for invariant checking.
//!
//! Invariants operate on snapshots rather than the live session so a check
//! always sees one consistent point in time.

use yaterm_core::{ConnectionState, Session, Transport, display::DEFAULT_MAX_DISPLAY_CHARS};

/// Snapshot of one session's observable state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Retained display characters.
    pub display_len: usize,
    /// Display bound.
    pub max_display_chars: usize,
    /// Character count of each retained segment, oldest first.
    pub segment_chars: Vec<usize>,
    /// Remembered input lines.
    pub history_len: usize,
    /// History bound.
    pub history_capacity: usize,
    /// History browsing cursor.
    pub history_cursor: usize,
    /// Matched EOM prefix length.
    pub eom_index: usize,
    /// EOM length in characters.
    pub eom_len: usize,
    /// Connection state.
    pub state: ConnectionState,
    /// Whether the transport reports an open port.
    pub transport_open: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            display_len: 0,
            max_display_chars: DEFAULT_MAX_DISPLAY_CHARS,
            segment_chars: Vec::new(),
            history_len: 0,
            history_capacity: 64,
            history_cursor: 0,
            eom_index: 0,
            eom_len: 1,
            state: ConnectionState::Disconnected,
            transport_open: false,
        }
    }
}

impl SessionSnapshot {
    /// Capture the observable state of `session`.
    pub fn from_session<T: Transport>(session: &Session<T>) -> Self {
        let display = session.display();
        let history = session.history();
        let framer = session.framer();

        Self {
            display_len: display.len(),
            max_display_chars: display.max_chars(),
            segment_chars: display.segments().map(|s| s.char_len()).collect(),
            history_len: history.len(),
            history_capacity: history.capacity(),
            history_cursor: history.cursor(),
            eom_index: framer.eom_index(),
            eom_len: framer.eom_len(),
            state: session.state(),
            transport_open: session.transport().is_open(),
        }
    }
}
