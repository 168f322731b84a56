//! Async runtime
//!
//! Event loop that drives terminal I/O and feeds the session. Uses
//! `tokio::select!` over three sources, handled one at a time in arrival
//! order: terminal events, serial reader events and a one second tick that
//! refreshes the port list.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;
use yaterm_core::{ConfigError, ConnectionError, PortEnumerator, Session, Transport};
use yaterm_serial::{SerialEvent, SerialTransport};

use crate::{InputAction, InputState, KeyInput, ui};

/// Interval between port enumerations.
const PORT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid session configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Applying a setting required a reconnect that failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
}

/// Raw mode and alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, RuntimeError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Async runtime for the TUI.
///
/// Owns the terminal, the session and the receiving end of the serial reader
/// channel.
pub struct Runtime<P> {
    guard: TerminalGuard,
    session: Session<SerialTransport>,
    serial_rx: mpsc::UnboundedReceiver<SerialEvent>,
    ports: P,
    input: InputState,
}

impl<P: PortEnumerator> Runtime<P> {
    /// Take over the terminal.
    pub fn new(
        session: Session<SerialTransport>,
        serial_rx: mpsc::UnboundedReceiver<SerialEvent>,
        ports: P,
    ) -> Result<Self, RuntimeError> {
        let guard = TerminalGuard::enter()?;
        Ok(Self { guard, session, serial_rx, ports, input: InputState::new() })
    }

    /// Run until the session quits. Returns the session for saving settings.
    pub async fn run(mut self) -> Result<Session<SerialTransport>, RuntimeError> {
        self.render()?;

        let mut event_stream = EventStream::new();
        let mut port_poll = tokio::time::interval(PORT_POLL_INTERVAL);

        while !self.session.should_quit() {
            let render = tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => return Err(RuntimeError::Io(e)),
                        None => {
                            self.session.quit();
                            false
                        },
                    }
                }

                // Serial reader
                Some(event) = self.serial_rx.recv() => {
                    let generation = self.session.transport().generation();
                    apply_serial_event(&mut self.session, generation, event);
                    false
                }

                // Port enumeration
                _ = port_poll.tick() => {
                    self.session.set_available_ports(self.ports.list_available_ports());
                    false
                }
            };

            let changed = !self.session.take_notifications().is_empty();
            if render || changed {
                self.render()?;
            }
        }

        tracing::info!("Exiting");
        let Self { session, .. } = self;
        Ok(session)
    }

    /// Handle a terminal event and return whether to redraw.
    fn handle_terminal_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(key_input) = convert_key(key) else {
                    return false;
                };
                let actions = self.input.handle_key(key_input, &mut self.session);
                actions.contains(&InputAction::Render)
            },
            Event::Resize(..) => true,
            _ => false,
        }
    }

    /// Render the UI.
    fn render(&mut self) -> Result<(), RuntimeError> {
        self.guard.terminal.draw(|frame| {
            ui::render(frame, &self.session, &self.input);
        })?;
        Ok(())
    }
}

/// Deliver a reader event to the session.
///
/// Events from a reader of an earlier open call are dropped. Returns whether
/// the event was delivered.
pub fn apply_serial_event<T: Transport>(
    session: &mut Session<T>,
    generation: u64,
    event: SerialEvent,
) -> bool {
    if event.generation() != generation {
        tracing::trace!("Dropping event of stale reader {}", event.generation());
        return false;
    }

    match event {
        SerialEvent::Data { bytes, .. } => session.on_readable(&bytes),
        SerialEvent::Closed { reason, .. } => session.on_transport_closed(&reason),
    }
    true
}

/// Convert a crossterm key event to `KeyInput`. Ctrl+C maps to Esc.
pub fn convert_key(key: KeyEvent) -> Option<KeyInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'd') => Some(KeyInput::Esc),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Tab => Some(KeyInput::Tab),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Up => Some(KeyInput::Up),
        KeyCode::Down => Some(KeyInput::Down),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}
