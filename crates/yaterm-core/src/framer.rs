//! Delimiter framing for the inbound text stream.
//!
//! The transport delivers text in chunks whose boundaries carry no meaning. A
//! multi-character end-of-message delimiter (EOM) can arrive split across two
//! reads, so the match position is kept in [`Framer`] between calls to
//! [`Framer::feed`].
//!
//! # Invariants
//!
//! - Chunk-boundary invariance: feeding `a` then `b` produces the same
//!   [`coalesce`]d event sequence as feeding `a + b` at once.
//! - `eom_index < eom.len()` after every call.
//! - Delimiter characters are content. They stay in the emitted text and a
//!   failed partial match is never re-scanned.

use crate::error::ConfigError;

/// Rendering operation produced by the framer or the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// Start a new display segment with this text.
    Append(String),
    /// Continue the current display segment with this text.
    Insert(String),
    /// Wipe the display log.
    Clear,
    /// A complete end-of-message delimiter was observed.
    FrameBoundary,
}

/// Streaming EOM scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framer {
    /// End-of-message delimiter. Never empty.
    eom: Vec<char>,
    /// Number of EOM characters matched so far.
    eom_index: usize,
    /// Whether the current segment is an inbound message still being received.
    in_message: bool,
}

impl Framer {
    /// Create a framer for the given end-of-message delimiter.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyEom`] if `eom` is empty: every character would
    /// complete a match.
    pub fn new(eom: &str) -> Result<Self, ConfigError> {
        let eom: Vec<char> = eom.chars().collect();
        if eom.is_empty() {
            return Err(ConfigError::EmptyEom);
        }

        Ok(Self { eom, eom_index: 0, in_message: false })
    }

    /// Scan a chunk and return the resulting events.
    ///
    /// Consecutive characters of one chunk are coalesced into a single
    /// `Append` or `Insert`. An empty chunk produces no events.
    pub fn feed(&mut self, chunk: &str) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        let mut pending = String::new();
        let mut starts_segment = false;

        for c in chunk.chars() {
            if !self.in_message {
                self.in_message = true;
                starts_segment = true;
            }
            pending.push(c);

            if self.eom.get(self.eom_index) == Some(&c) {
                self.eom_index += 1;
                if self.eom_index == self.eom.len() {
                    flush(&mut events, &mut pending, starts_segment);
                    events.push(FrameEvent::FrameBoundary);
                    self.eom_index = 0;
                    self.in_message = false;
                    starts_segment = false;
                }
            } else {
                self.eom_index = 0;
            }
        }

        flush(&mut events, &mut pending, starts_segment);
        events
    }

    /// Discard any partially received frame.
    pub fn reset(&mut self) {
        self.eom_index = 0;
        self.in_message = false;
    }

    /// Start the next inbound text in a new segment.
    ///
    /// Used when a local segment is interleaved with an incoming message. The
    /// partial delimiter match survives, so an EOM split around the
    /// interruption is still recognised.
    pub fn interrupt(&mut self) {
        self.in_message = false;
    }

    /// Replace the delimiter and discard partial state.
    pub fn set_eom(&mut self, eom: &str) -> Result<(), ConfigError> {
        *self = Self::new(eom)?;
        Ok(())
    }

    /// End-of-message delimiter.
    pub fn eom(&self) -> String {
        self.eom.iter().collect()
    }

    /// Number of EOM characters matched so far.
    pub fn eom_index(&self) -> usize {
        self.eom_index
    }

    /// Length of the delimiter in characters.
    pub fn eom_len(&self) -> usize {
        self.eom.len()
    }

    /// Delimiter prefix matched by the most recent characters.
    pub fn pending_match(&self) -> String {
        self.eom.iter().take(self.eom_index).collect()
    }

    /// Whether an inbound message segment is open.
    pub fn in_message(&self) -> bool {
        self.in_message
    }
}

fn flush(events: &mut Vec<FrameEvent>, pending: &mut String, starts_segment: bool) {
    if pending.is_empty() {
        return;
    }

    let text = std::mem::take(pending);
    events.push(if starts_segment { FrameEvent::Append(text) } else { FrameEvent::Insert(text) });
}

/// Merge every `Insert` into the preceding `Append` or `Insert`.
///
/// Two event sequences describe the same display history exactly when their
/// coalesced forms are equal.
pub fn coalesce(events: impl IntoIterator<Item = FrameEvent>) -> Vec<FrameEvent> {
    let mut out: Vec<FrameEvent> = Vec::new();
    for event in events {
        if let FrameEvent::Insert(more) = &event
            && let Some(FrameEvent::Append(text) | FrameEvent::Insert(text)) = out.last_mut()
        {
            text.push_str(more);
            continue;
        }
        out.push(event);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn append(s: &str) -> FrameEvent {
        FrameEvent::Append(s.to_string())
    }

    fn insert(s: &str) -> FrameEvent {
        FrameEvent::Insert(s.to_string())
    }

    #[test]
    fn empty_eom_rejected() {
        assert_eq!(Framer::new(""), Err(ConfigError::EmptyEom));

        let mut framer = Framer::new("\r").unwrap();
        assert_eq!(framer.set_eom(""), Err(ConfigError::EmptyEom));
        assert_eq!(framer.eom(), "\r");
    }

    #[test]
    fn single_chunk_with_delimiter() {
        let mut framer = Framer::new("\r\n").unwrap();
        let events = framer.feed("abc\r\ndef");

        assert_eq!(events, vec![append("abc\r\n"), FrameEvent::FrameBoundary, append("def")]);
        assert!(framer.in_message());
    }

    #[test]
    fn split_delimiter_across_reads() {
        let mut framer = Framer::new("\r\n").unwrap();

        assert_eq!(framer.feed("abc\r"), vec![append("abc\r")]);
        assert_eq!(framer.eom_index(), 1);
        assert_eq!(framer.pending_match(), "\r");

        assert_eq!(framer.feed("\ndef"), vec![
            insert("\n"),
            FrameEvent::FrameBoundary,
            append("def")
        ]);
        assert_eq!(framer.eom_index(), 0);
    }

    #[test]
    fn continuation_chunk_is_insert() {
        let mut framer = Framer::new("\n").unwrap();

        assert_eq!(framer.feed("hel"), vec![append("hel")]);
        assert_eq!(framer.feed("lo"), vec![insert("lo")]);
        assert_eq!(framer.feed(""), vec![]);
    }

    #[test]
    fn mismatch_resets_without_backtracking() {
        let mut framer = Framer::new("ab").unwrap();

        // 'a' matches, second 'a' fails and is not re-tested against EOM[0].
        let events = framer.feed("aab");
        assert_eq!(events, vec![append("aab")]);
        assert_eq!(framer.eom_index(), 0);

        let events = framer.feed("ab");
        assert_eq!(events, vec![insert("ab"), FrameEvent::FrameBoundary]);
    }

    #[test]
    fn consecutive_delimiters_yield_consecutive_boundaries() {
        let mut framer = Framer::new("\n").unwrap();
        let events = framer.feed("\n\n");

        assert_eq!(events, vec![
            append("\n"),
            FrameEvent::FrameBoundary,
            append("\n"),
            FrameEvent::FrameBoundary
        ]);
        assert!(!framer.in_message());
    }

    #[test]
    fn interrupt_keeps_partial_match() {
        let mut framer = Framer::new("\r\n").unwrap();
        framer.feed("ok\r");
        framer.interrupt();

        assert_eq!(framer.feed("\n"), vec![append("\n"), FrameEvent::FrameBoundary]);
    }

    #[test]
    fn reset_discards_partial_match() {
        let mut framer = Framer::new("\r\n").unwrap();
        framer.feed("ok\r");
        framer.reset();

        assert_eq!(framer.feed("\n"), vec![append("\n")]);
        assert_eq!(framer.eom_index(), 0);
    }

    #[test]
    fn line_feeds_are_plain_content() {
        let mut framer = Framer::new("\r").unwrap();
        assert_eq!(framer.feed("a\nb\n"), vec![append("a\nb\n")]);
    }

    #[test]
    fn multibyte_delimiter_characters() {
        let mut framer = Framer::new("¶§").unwrap();
        assert_eq!(framer.feed("x¶"), vec![append("x¶")]);
        assert_eq!(framer.feed("§y"), vec![insert("§"), FrameEvent::FrameBoundary, append("y")]);
    }

    #[test]
    fn coalesce_merges_continuations() {
        let events = vec![
            append("ab"),
            insert("c"),
            FrameEvent::FrameBoundary,
            append("d"),
            insert(""),
            FrameEvent::Clear,
            insert("e"),
        ];

        assert_eq!(coalesce(events), vec![
            append("abc"),
            FrameEvent::FrameBoundary,
            append("d"),
            FrameEvent::Clear,
            insert("e"),
        ]);
    }
}
