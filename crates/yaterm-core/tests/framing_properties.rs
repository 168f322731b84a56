//! Property-based tests for the framer, display log and history ring.

use proptest::prelude::*;
use yaterm_core::{
    DisplayLog, FrameEvent, Framer, History, SegmentKind, Utf8Stream, framer::coalesce,
};

/// Delimiters made of the characters that also appear in the text, so partial
/// matches are frequent.
fn eom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("\r".to_string()), Just("\r\n".to_string()), "[ab\r\n]{1,3}"]
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[ab\r\nxé]{0,40}"
}

/// Split `text` at the given char positions.
fn split_at_chars(text: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (chars.len() + 1)).collect();
    cuts.sort_unstable();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(chars[start..cut].iter().collect());
        start = cut;
    }
    chunks.push(chars[start..].iter().collect());
    chunks
}

proptest! {
    /// Chunk boundaries never change what the framer reports.
    #[test]
    fn prop_chunk_boundary_invariance(
        eom in eom_strategy(),
        text in text_strategy(),
        cuts in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut whole = Framer::new(&eom).unwrap();
        let expected = coalesce(whole.feed(&text));

        let mut chunked = Framer::new(&eom).unwrap();
        let mut events = Vec::new();
        for chunk in split_at_chars(&text, &cuts) {
            events.extend(chunked.feed(&chunk));
        }

        prop_assert_eq!(coalesce(events), expected);
        prop_assert_eq!(chunked.eom_index(), whole.eom_index());
        prop_assert_eq!(chunked.in_message(), whole.in_message());
    }

    /// Emitted text is exactly the input, and the index stays a strict prefix.
    #[test]
    fn prop_framer_preserves_text(eom in eom_strategy(), text in text_strategy()) {
        let mut framer = Framer::new(&eom).unwrap();
        let mut emitted = String::new();
        let mut boundaries = 0;

        for event in framer.feed(&text) {
            match event {
                FrameEvent::Append(t) | FrameEvent::Insert(t) => emitted.push_str(&t),
                FrameEvent::FrameBoundary => boundaries += 1,
                FrameEvent::Clear => prop_assert!(false, "framer never clears"),
            }
            prop_assert!(framer.eom_index() < framer.eom_len());
        }

        prop_assert_eq!(emitted, text.clone());
        prop_assert!(boundaries <= text.matches(eom.as_str()).count());
    }

    /// The log keeps exactly the newest `max` characters of everything written.
    #[test]
    fn prop_log_is_bounded_suffix(
        max in 1usize..64,
        ops in prop::collection::vec((any::<bool>(), "[a-z\n]{0,20}"), 0..30),
    ) {
        let mut log = DisplayLog::new(max).unwrap();
        let mut everything = String::new();

        for (new_segment, text) in &ops {
            if *new_segment {
                log.append(SegmentKind::ReadMessage, text);
            } else {
                log.insert(text);
            }
            everything.push_str(text);

            let contents = log.contents();
            prop_assert!(contents.chars().count() <= max);
            prop_assert_eq!(contents.chars().count(), log.len());

            let skip = everything.chars().count().saturating_sub(max);
            let suffix: String = everything.chars().skip(skip).collect();
            prop_assert_eq!(contents, suffix);
        }
    }

    /// History holds the newest `capacity` lines and the cursor stays in range.
    #[test]
    fn prop_history_bound_and_cursor(
        capacity in 1usize..10,
        steps in prop::collection::vec(0u8..4, 0..60),
    ) {
        let mut history = History::new(capacity);
        let mut recorded = 0usize;

        for step in steps {
            match step {
                0 => {
                    history.record(format!("line {recorded}"));
                    recorded += 1;
                    prop_assert_eq!(history.cursor(), history.len());
                },
                1 => {
                    history.previous();
                },
                2 => {
                    history.next();
                },
                _ => history.reset_cursor(),
            }

            prop_assert!(history.len() <= capacity);
            prop_assert_eq!(history.len(), recorded.min(capacity));
            prop_assert!(history.cursor() <= history.len());
        }

        let first_kept = recorded.saturating_sub(capacity);
        let expected: Vec<String> = (first_kept..recorded).map(|i| format!("line {i}")).collect();
        prop_assert_eq!(history.iter().collect::<Vec<_>>(), expected);
    }

    /// UTF-8 decoding does not depend on where reads split the bytes.
    #[test]
    fn prop_utf8_split_invariance(
        bytes in prop::collection::vec(any::<u8>(), 0..32),
        cut in any::<usize>(),
    ) {
        let cut = cut % (bytes.len() + 1);
        let mut whole = Utf8Stream::new();
        let mut split = Utf8Stream::new();

        let expected = whole.decode(&bytes);
        let mut actual = split.decode(&bytes[..cut]);
        actual.push_str(&split.decode(&bytes[cut..]));

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(split.is_pending(), whole.is_pending());
    }
}
