//! Input line editing and key handling.
//!
//! The input state owns the line being typed. Submitted lines, history
//! browsing and port cycling go straight to the session.

use yaterm_core::{Session, Transport};

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Tab key.
    Tab,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// What the runtime should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Redraw the screen.
    Render,
    /// Leave the event loop.
    Quit,
}

/// Text input buffer with a cursor counted in characters.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    pub fn handle_key<T: Transport>(
        &mut self,
        key: KeyInput,
        session: &mut Session<T>,
    ) -> Vec<InputAction> {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_index(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => {
                if self.cursor < self.char_len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
            },
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_len(),
            KeyInput::Up => {
                if let Some(line) = session.prev_history().map(str::to_string) {
                    self.replace(line);
                }
            },
            KeyInput::Down => {
                let line = session.next_history().map(str::to_string).unwrap_or_default();
                self.replace(line);
            },
            KeyInput::Enter => return self.handle_enter(session),
            KeyInput::Tab => Self::handle_tab(session),
            KeyInput::Esc => {
                session.quit();
                return vec![InputAction::Quit];
            },
        }
        vec![InputAction::Render]
    }

    /// Submit the line. Empty lines are submitted too.
    fn handle_enter<T: Transport>(&mut self, session: &mut Session<T>) -> Vec<InputAction> {
        let text = std::mem::take(&mut self.buffer);
        self.cursor = 0;

        session.parse_input(&text);

        if session.should_quit() { vec![InputAction::Quit] } else { vec![InputAction::Render] }
    }

    /// Select the next enumerated port, wrapping around.
    fn handle_tab<T: Transport>(session: &mut Session<T>) {
        let ports = session.available_ports();
        if ports.is_empty() {
            return;
        }

        let current = session.port().and_then(|port| ports.iter().position(|p| p == port));
        let next = current.map_or(0, |idx| (idx + 1) % ports.len());

        if let Some(port) = ports.get(next).cloned()
            && let Err(err) = session.set_port(&port)
        {
            tracing::debug!("Switching to {port} failed: {err}");
        }
    }

    fn replace(&mut self, line: String) {
        self.buffer = line;
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use yaterm_core::{ConnectionState, SegmentKind};
    use yaterm_harness::{SIM_PORTS, sim_session};

    use super::*;

    fn type_line<T: Transport>(input: &mut InputState, session: &mut Session<T>, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c), session);
        }
    }

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();

        input.handle_key(KeyInput::Char('h'), &mut session);
        input.handle_key(KeyInput::Char('i'), &mut session);

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn editing_respects_multibyte_characters() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();

        type_line(&mut input, &mut session, "héé");
        input.handle_key(KeyInput::Left, &mut session);
        input.handle_key(KeyInput::Backspace, &mut session);
        assert_eq!(input.buffer(), "hé");
        assert_eq!(input.cursor(), 1);

        input.handle_key(KeyInput::Char('ö'), &mut session);
        input.handle_key(KeyInput::Delete, &mut session);
        assert_eq!(input.buffer(), "hö");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        type_line(&mut input, &mut session, "abc");

        input.handle_key(KeyInput::Home, &mut session);
        assert_eq!(input.cursor(), 0);
        input.handle_key(KeyInput::Left, &mut session);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End, &mut session);
        assert_eq!(input.cursor(), 3);
        input.handle_key(KeyInput::Right, &mut session);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        session.connect().unwrap();

        type_line(&mut input, &mut session, "ping");
        let actions = input.handle_key(KeyInput::Enter, &mut session);

        assert_eq!(actions, vec![InputAction::Render]);
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
        assert_eq!(session.transport().writes(), [b"ping\r\n".to_vec()]);
    }

    #[test]
    fn empty_enter_still_writes_delimiter() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        session.connect().unwrap();

        input.handle_key(KeyInput::Enter, &mut session);

        assert_eq!(session.transport().writes(), [b"\r\n".to_vec()]);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn history_browsing_fills_buffer() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        for line in ["first", "second"] {
            type_line(&mut input, &mut session, line);
            input.handle_key(KeyInput::Enter, &mut session);
        }

        input.handle_key(KeyInput::Up, &mut session);
        assert_eq!(input.buffer(), "second");
        input.handle_key(KeyInput::Up, &mut session);
        assert_eq!(input.buffer(), "first");
        assert_eq!(input.cursor(), 5);
        input.handle_key(KeyInput::Up, &mut session);
        assert_eq!(input.buffer(), "first");

        input.handle_key(KeyInput::Down, &mut session);
        assert_eq!(input.buffer(), "second");
        input.handle_key(KeyInput::Down, &mut session);
        assert_eq!(input.buffer(), "");
    }

    #[test]
    fn tab_cycles_ports() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        session.set_available_ports(SIM_PORTS.iter().map(ToString::to_string).collect());
        assert_eq!(session.port(), Some(SIM_PORTS[0]));

        input.handle_key(KeyInput::Tab, &mut session);
        assert_eq!(session.port(), Some(SIM_PORTS[1]));

        input.handle_key(KeyInput::Tab, &mut session);
        input.handle_key(KeyInput::Tab, &mut session);
        assert_eq!(session.port(), Some(SIM_PORTS[0]));
    }

    #[test]
    fn tab_while_connected_reconnects() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        session.set_available_ports(SIM_PORTS.iter().map(ToString::to_string).collect());
        session.connect().unwrap();

        input.handle_key(KeyInput::Tab, &mut session);

        assert_eq!(session.state(), ConnectionState::Connected);
        assert_eq!(session.transport().open_port(), Some(SIM_PORTS[1]));
    }

    #[test]
    fn tab_without_ports_does_nothing() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();

        input.handle_key(KeyInput::Tab, &mut session);

        assert_eq!(session.port(), Some(SIM_PORTS[0]));
    }

    #[test]
    fn quit_command_and_escape_both_quit() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();
        type_line(&mut input, &mut session, "/quit");
        assert_eq!(input.handle_key(KeyInput::Enter, &mut session), vec![InputAction::Quit]);

        let mut session = sim_session().unwrap();
        session.connect().unwrap();
        assert_eq!(input.handle_key(KeyInput::Esc, &mut session), vec![InputAction::Quit]);
        assert!(session.should_quit());
        assert!(!session.transport().is_open());
    }

    #[test]
    fn commands_are_echoed() {
        let mut input = InputState::new();
        let mut session = sim_session().unwrap();

        type_line(&mut input, &mut session, "/help quit");
        input.handle_key(KeyInput::Enter, &mut session);

        let kinds: Vec<_> = session.display().segments().map(|s| s.kind).collect();
        assert_eq!(kinds, [
            SegmentKind::Command,
            SegmentKind::CommandResponse,
            SegmentKind::CommandResponse
        ]);
    }
}
