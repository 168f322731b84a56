//! Ports sidebar
//!
//! Lists the enumerated ports and marks the selected one.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use yaterm_core::{Session, Transport};

const SELECTED_PREFIX: &str = ">";
const UNSELECTED_PREFIX: &str = " ";

/// Render the ports sidebar.
pub fn render<T: Transport>(frame: &mut Frame, session: &Session<T>, area: Rect) {
    let selected = session.port();

    let items: Vec<ListItem> = if session.available_ports().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            " none",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        session
            .available_ports()
            .iter()
            .map(|port| {
                let is_selected = selected == Some(port.as_str());
                let (prefix, style) = match (is_selected, session.is_connected()) {
                    (true, true) => (
                        SELECTED_PREFIX,
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    (true, false) => (
                        SELECTED_PREFIX,
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    (false, _) => (UNSELECTED_PREFIX, Style::default()),
                };

                let spans = vec![Span::raw(prefix), Span::styled(port.clone(), style)];
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let block = Block::default().borders(Borders::ALL).title(" Ports ");
    frame.render_widget(List::new(items).block(block), area);
}
