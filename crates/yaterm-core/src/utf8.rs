//! Streaming UTF-8 decoding for inbound bytes.
//!
//! A multi-byte character can straddle two reads. The trailing incomplete
//! sequence of a chunk is held back until the next chunk completes it, so
//! decoding is as chunk-boundary invariant as framing.

/// Incremental UTF-8 decoder.
#[derive(Debug, Clone, Default)]
pub struct Utf8Stream {
    /// Incomplete sequence carried over from the previous chunk (at most 3
    /// bytes).
    pending: Vec<u8>,
}

impl Utf8Stream {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, replacing invalid sequences with U+FFFD.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut out = String::with_capacity(input.len());
        let mut rest = input.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                },
                Err(err) => {
                    let (valid, invalid) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = invalid.get(len..).unwrap_or_default();
                        },
                        None => {
                            self.pending = invalid.to_vec();
                            break;
                        },
                    }
                },
            }
        }

        out
    }

    /// Drop any incomplete sequence.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Whether an incomplete sequence is waiting for more bytes.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
