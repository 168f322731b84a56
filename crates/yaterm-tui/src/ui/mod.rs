//! UI rendering
//!
//! Rendering functions that draw the session into a ratatui frame. All
//! functions are pure (no I/O).

mod input;
mod ports;
mod scrollback;
mod status;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use yaterm_core::{Session, Transport};

use crate::InputState;

/// Render the entire UI.
pub fn render<T: Transport>(frame: &mut Frame, session: &Session<T>, input: &InputState) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, session, *main_area);
    input::render(frame, session, input, *input_area);
    status::render(frame, session, *status_area);
}

/// Render the main area (ports sidebar + log).
fn render_main_area<T: Transport>(frame: &mut Frame, session: &Session<T>, area: Rect) {
    const PORT_SIDEBAR_WIDTH: u16 = 16;
    const LOG_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(PORT_SIDEBAR_WIDTH), Constraint::Min(LOG_AREA_MIN_WIDTH)])
        .split(area);

    let [ports_area, log_area] = chunks.as_ref() else {
        return;
    };

    ports::render(frame, session, *ports_area);
    scrollback::render(frame, session, *log_area);
}
