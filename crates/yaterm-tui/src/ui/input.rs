//! Input line
//!
//! Displays the input buffer with cursor. The border title shows the
//! delimiters wrapped around each submitted line.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use yaterm_core::{Session, Transport, settings::eom_label};

use crate::InputState;

const PROMPT_WIDTH: u16 = 3; // border + "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the input line.
pub fn render<T: Transport>(
    frame: &mut Frame,
    session: &Session<T>,
    input: &InputState,
    area: Rect,
) {
    let title = if session.som().is_empty() {
        format!(" EOM {} ", eom_label(&session.eom()))
    } else {
        format!(" SOM {:?} EOM {} ", session.som(), eom_label(&session.eom()))
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let paragraph = Paragraph::new(format!("> {}", input.buffer()))
        .style(Style::default().fg(Color::White))
        .block(block);
    frame.render_widget(paragraph, area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = u16::try_from(input.cursor()).unwrap_or(u16::MAX).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);

    frame.set_cursor_position((cursor_x.min(max_x), cursor_y));
}
