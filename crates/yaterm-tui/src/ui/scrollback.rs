//! Scrollback area
//!
//! Turns display log segments into styled terminal lines. Received text flows
//! on, breaking at CR, LF or CR LF. Local segments (writes, commands, command
//! output, errors) always occupy lines of their own.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use yaterm_core::{DisplayLog, SegmentKind, Session, Transport};

const BORDER_SIZE: u16 = 2;
const COMMAND_PREFIX: &str = "$ ";
const ERROR_PREFIX: &str = "ERROR: ";

/// Render the scrollback, newest lines at the bottom.
pub fn render<T: Transport>(frame: &mut Frame, session: &Session<T>, area: Rect) {
    let title = session.port().map_or_else(|| " No port ".to_string(), |port| format!(" {port} "));
    let block = Block::default().borders(Borders::ALL).title(title);

    let rendered = lines(session.display());
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = rendered.len().saturating_sub(visible_height);
    let items: Vec<ListItem> = rendered.into_iter().skip(skip).map(ListItem::new).collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Styled lines for the whole log, oldest first.
pub fn lines(display: &DisplayLog) -> Vec<Line<'static>> {
    let mut builder = LineBuilder::default();

    for segment in display.segments() {
        let style = style_for(segment.kind);

        if segment.kind == SegmentKind::ReadMessage {
            builder.push_text(&segment.text, style);
            continue;
        }

        builder.close_line();
        match segment.kind {
            SegmentKind::Command => builder.push_text(COMMAND_PREFIX, style),
            SegmentKind::Error => builder.push_text(ERROR_PREFIX, style),
            _ => {},
        }
        builder.push_text(&segment.text, style);
        builder.close_line();
    }

    builder.finish()
}

fn style_for(kind: SegmentKind) -> Style {
    match kind {
        SegmentKind::ReadMessage => Style::default(),
        SegmentKind::WriteMessage => Style::default().add_modifier(Modifier::BOLD),
        SegmentKind::Command => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        SegmentKind::CommandResponse => Style::default().fg(Color::Blue),
        SegmentKind::Error => Style::default().fg(Color::Red),
    }
}

#[derive(Default)]
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    /// Last character was a CR, so an immediately following LF is part of
    /// the same break even when it arrives in a later segment.
    after_cr: bool,
}

impl LineBuilder {
    fn push_text(&mut self, text: &str, style: Style) {
        let mut run = String::new();

        for c in text.chars() {
            match c {
                '\n' if self.after_cr => self.after_cr = false,
                '\r' | '\n' => {
                    self.flush(&mut run, style);
                    self.break_line();
                    self.after_cr = c == '\r';
                },
                _ => {
                    self.after_cr = false;
                    run.push(c);
                },
            }
        }
        self.flush(&mut run, style);
    }

    fn flush(&mut self, run: &mut String, style: Style) {
        if !run.is_empty() {
            self.spans.push(Span::styled(std::mem::take(run), style));
        }
    }

    fn break_line(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }

    /// End the current line unless it is empty.
    fn close_line(&mut self) {
        self.after_cr = false;
        if !self.spans.is_empty() {
            self.break_line();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.spans.is_empty() {
            self.break_line();
        }
        self.lines
    }
}
