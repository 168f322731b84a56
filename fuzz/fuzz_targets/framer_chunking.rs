//! Fuzz target for delimiter framing across arbitrary read boundaries
//!
//! # Strategy
//!
//! - Delimiters: CR, LF, CR LF, and arbitrary (possibly empty) strings
//! - Input: arbitrary bytes, decoded as a stream so multi-byte characters can
//!   be split between reads
//! - Cuts: arbitrary byte offsets where the transport delivered a chunk
//!
//! # Invariants
//!
//! - An empty delimiter is rejected at construction
//! - Decoding the chunks yields the same text as decoding the whole input
//! - Coalesced framer events do not depend on the cuts
//! - Emitted text is exactly the decoded input
//! - The match index stays below the delimiter length
//! - NEVER panic

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use yaterm_core::{FrameEvent, Framer, Utf8Stream, framer::coalesce};
use yaterm_harness::EomChoice;

#[derive(Debug, Arbitrary)]
struct ChunkedRead {
    eom: EomChoice,
    bytes: Vec<u8>,
    cuts: Vec<u16>,
}

fuzz_target!(|input: ChunkedRead| {
    let eom = input.eom.as_str();
    let Ok(mut whole) = Framer::new(eom) else {
        assert!(eom.is_empty(), "non-empty delimiter rejected: {eom:?}");
        return;
    };
    let Ok(mut chunked) = Framer::new(eom) else {
        return;
    };

    let text = Utf8Stream::new().decode(&input.bytes);
    let expected = coalesce(whole.feed(&text));

    let mut cuts: Vec<usize> =
        input.cuts.iter().map(|c| usize::from(*c) % (input.bytes.len() + 1)).collect();
    cuts.sort_unstable();
    cuts.push(input.bytes.len());

    let mut decoder = Utf8Stream::new();
    let mut decoded = String::new();
    let mut events = Vec::new();
    let mut start = 0;
    for cut in cuts {
        let chunk = decoder.decode(&input.bytes[start..cut]);
        decoded.push_str(&chunk);
        events.extend(chunked.feed(&chunk));
        assert!(chunked.eom_index() < chunked.eom_len());
        start = cut;
    }

    assert_eq!(decoded, text);
    assert_eq!(coalesce(events.clone()), expected);

    let emitted: String = events
        .into_iter()
        .filter_map(|event| match event {
            FrameEvent::Append(t) | FrameEvent::Insert(t) => Some(t),
            FrameEvent::FrameBoundary | FrameEvent::Clear => None,
        })
        .collect();
    assert_eq!(emitted, text);
});
