//! Bounded display log.
//!
//! The log is the single linear history the user sees: inbound messages,
//! echoed writes, commands, command output and errors, in the order the
//! session observed them. It keeps at most `max_chars` characters and evicts
//! from the front when a mutation would exceed that.
//!
//! Styling is carried by [`SegmentKind`], never by characters in the text, so
//! trimming can cut anywhere without corrupting markup. Text is sanitized on
//! the way in: control characters that a terminal would interpret (ESC, BEL,
//! backspace, ...) are replaced one-for-one by their Unicode control-picture
//! glyphs, so received bytes cannot inject escape sequences.

use std::collections::VecDeque;

use crate::error::ConfigError;

/// Default retained size, in characters.
pub const DEFAULT_MAX_DISPLAY_CHARS: usize = 16 * 1024;

/// Kind of a display segment. Determines styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Text received from the transport.
    ReadMessage,
    /// Text written to the transport (SOM + payload + EOM).
    WriteMessage,
    /// Echo of a command line.
    Command,
    /// Output of a command.
    CommandResponse,
    /// User-visible error.
    Error,
}

/// One styled unit of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Styling kind.
    pub kind: SegmentKind,
    /// Sanitized content.
    pub text: String,
    /// Character count of `text`.
    chars: usize,
}

impl Segment {
    fn new(kind: SegmentKind, text: String) -> Self {
        let chars = text.chars().count();
        Self { kind, text, chars }
    }

    /// Length of the content in characters.
    pub fn char_len(&self) -> usize {
        self.chars
    }
}

/// Ordered, bounded sequence of segments.
#[derive(Debug, Clone)]
pub struct DisplayLog {
    segments: VecDeque<Segment>,
    /// Total characters across all segments.
    len: usize,
    max_chars: usize,
}

impl DisplayLog {
    /// Create an empty log retaining at most `max_chars` characters.
    pub fn new(max_chars: usize) -> Result<Self, ConfigError> {
        if max_chars == 0 {
            return Err(ConfigError::ZeroDisplayLength);
        }

        Ok(Self { segments: VecDeque::new(), len: 0, max_chars })
    }

    /// Start a new segment.
    pub fn append(&mut self, kind: SegmentKind, text: &str) {
        let segment = Segment::new(kind, sanitize(text));
        self.len += segment.chars;
        self.segments.push_back(segment);
        self.trim();
    }

    /// Extend the most recent segment.
    ///
    /// On an empty log (nothing received yet, or everything evicted) the text
    /// starts a new [`SegmentKind::ReadMessage`] segment.
    pub fn insert(&mut self, text: &str) {
        let text = sanitize(text);
        let chars = text.chars().count();

        match self.segments.back_mut() {
            Some(last) => {
                last.text.push_str(&text);
                last.chars += chars;
            },
            None => self.segments.push_back(Segment { kind: SegmentKind::ReadMessage, text, chars }),
        }

        self.len += chars;
        self.trim();
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.len = 0;
    }

    /// Change the retention bound, trimming immediately if needed.
    pub fn set_max_chars(&mut self, max_chars: usize) -> Result<(), ConfigError> {
        if max_chars == 0 {
            return Err(ConfigError::ZeroDisplayLength);
        }

        self.max_chars = max_chars;
        self.trim();
        Ok(())
    }

    /// Retained text, all segments concatenated.
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.len);
        for segment in &self.segments {
            out.push_str(&segment.text);
        }
        out
    }

    /// HTML projection: escaped text wrapped per segment kind.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            let text = html_escape(&segment.text);
            match segment.kind {
                SegmentKind::ReadMessage => {
                    out.push_str("<samp>");
                    out.push_str(&text.replace('\n', "\n<br>"));
                    out.push_str("</samp>");
                },
                SegmentKind::WriteMessage => {
                    out.push_str("<br><span><b>");
                    out.push_str(&text);
                    out.push_str("</b></span>");
                },
                SegmentKind::Command => {
                    out.push_str("<br><span style=\"color: blue;\"><b>$ ");
                    out.push_str(&text);
                    out.push_str("</b></span>");
                },
                SegmentKind::CommandResponse => {
                    out.push_str("<br><span style=\"color: blue;\">");
                    out.push_str(&text);
                    out.push_str("</span>");
                },
                SegmentKind::Error => {
                    out.push_str("<br><span style=\"color: red;\">ERROR: ");
                    out.push_str(&text);
                    out.push_str("</span>");
                },
            }
        }
        out
    }

    /// Retained segments, oldest first.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Most recent segment.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.back()
    }

    /// Retained characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.len == 0 && self.segments.is_empty()
    }

    /// Retention bound in characters.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Evict the oldest characters until the bound holds.
    fn trim(&mut self) {
        while self.len > self.max_chars {
            let excess = self.len - self.max_chars;
            let Some(front) = self.segments.front_mut() else {
                self.len = 0;
                return;
            };

            if front.chars <= excess {
                self.len -= front.chars;
                self.segments.pop_front();
            } else {
                let cut = front.text.char_indices().nth(excess).map_or(front.text.len(), |(i, _)| i);
                front.text.drain(..cut);
                front.chars -= excess;
                self.len -= excess;
            }
        }
    }
}

/// Replace terminal control characters with visible glyphs.
///
/// TAB, LF and CR are content and pass through. C0 controls map to U+2400
/// plus their code, DEL to U+2421 and C1 controls to U+FFFD, so the character
/// count is unchanged.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => c,
            '\u{0}'..='\u{1f}' => char::from_u32(0x2400 + c as u32).unwrap_or(char::REPLACEMENT_CHARACTER),
            '\u{7f}' => '\u{2421}',
            '\u{80}'..='\u{9f}' => char::REPLACEMENT_CHARACTER,
            _ => c,
        })
        .collect()
}

fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
