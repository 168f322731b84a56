//! Status bar
//!
//! Connection status, line settings and the last error.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use yaterm_core::{ConnectionState, Session, Transport};

/// Render the status bar.
pub fn render<T: Transport>(frame: &mut Frame, session: &Session<T>, area: Rect) {
    let status_style = match session.state() {
        ConnectionState::Disconnected => Style::default().fg(Color::White),
        ConnectionState::Connecting => Style::default().fg(Color::Yellow),
        ConnectionState::Connected => {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        },
    };

    let mut spans =
        vec![Span::raw(" "), Span::styled(session.status_text().to_string(), status_style)];
    if !session.error_text().is_empty() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            session.error_text().to_string(),
            Style::default().fg(Color::LightRed),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
