//! Session controller.
//!
//! [`Session`] is the root aggregate: it owns the display log, the input
//! history, the framer and the transport collaborator, and routes every event
//! between them. It is a plain state machine driven by one caller (the
//! runtime loop). No method blocks and no method panics; failures end up as
//! error segments in the log and in [`Session::error_text`].
//!
//! # Routing
//!
//! - Typed input goes through [`Session::parse_input`]: `/` lines to the
//!   command dispatcher, everything else to [`Session::write`]. A leading
//!   `\/` escapes a literal slash.
//! - Inbound bytes go through [`Session::on_readable`]: UTF-8 decoding, then
//!   the framer, then the display log.
//! - Every locally generated segment interrupts the current inbound message,
//!   so received text after it starts a new segment.

use std::mem;

use crate::{
    CommandRegistry, ConfigError, ConnectionError, ConnectionState, DisplayLog,
    FrameEvent, Framer, History, LineSettings, Notification, SegmentKind, SettingsStore,
    Transport, Utf8Stream, WriteError,
    command::{self, COMMAND_MARKER},
    display::DEFAULT_MAX_DISPLAY_CHARS,
    history::DEFAULT_HISTORY_LEN,
    settings::{self, keys},
};

/// Default end-of-message delimiter.
pub const DEFAULT_EOM: &str = "\r";

/// Escape prefix for sending a line that starts with the command marker.
const ESCAPED_MARKER: &str = "\\/";

/// Construction parameters for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Initially selected port.
    pub port: Option<String>,
    /// End-of-message delimiter. Must not be empty.
    pub eom: String,
    /// Start-of-message prefix for outgoing writes.
    pub som: String,
    /// Display log bound in characters. Must be positive.
    pub max_display_chars: usize,
    /// Input history bound.
    pub history_len: usize,
    /// Serial line parameters.
    pub line_settings: LineSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            port: None,
            eom: DEFAULT_EOM.to_string(),
            som: String::new(),
            max_display_chars: DEFAULT_MAX_DISPLAY_CHARS,
            history_len: DEFAULT_HISTORY_LEN,
            line_settings: LineSettings::default(),
        }
    }
}

/// Serial terminal session.
pub struct Session<T> {
    transport: T,
    state: ConnectionState,
    port: Option<String>,
    som: String,
    line_settings: LineSettings,
    display: DisplayLog,
    history: History,
    framer: Framer,
    decoder: Utf8Stream,
    commands: CommandRegistry<T>,
    available_ports: Vec<String>,
    status: String,
    error: String,
    notifications: Vec<Notification>,
    should_quit: bool,
}

impl<T: Transport> Session<T> {
    /// Create a disconnected session.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for an empty EOM or a zero display bound.
    pub fn new(transport: T, config: SessionConfig) -> Result<Self, ConfigError> {
        let framer = Framer::new(&config.eom)?;
        let display = DisplayLog::new(config.max_display_chars)?;

        let mut session = Self {
            transport,
            state: ConnectionState::Disconnected,
            port: config.port.filter(|port| !port.is_empty()),
            som: config.som,
            line_settings: config.line_settings,
            display,
            history: History::new(config.history_len),
            framer,
            decoder: Utf8Stream::new(),
            commands: CommandRegistry::builtin(),
            available_ports: Vec::new(),
            status: String::new(),
            error: String::new(),
            notifications: Vec::new(),
            should_quit: false,
        };
        session.refresh_status();
        session.notifications.clear();
        Ok(session)
    }

    /// Open the selected port.
    ///
    /// On failure the session stays disconnected and the error is also
    /// reported in the log and the error text. There is no retry.
    pub fn connect(&mut self) -> Result<(), ConnectionError> {
        let Some(port) = self.port.clone() else {
            let err = ConnectionError::NoPort;
            self.report_error(&err.to_string());
            return Err(err);
        };

        if self.transport.is_open() {
            self.transport.close();
        }

        self.set_state(ConnectionState::Connecting);
        match self.transport.open(&port, &self.line_settings) {
            Ok(()) => {
                self.framer.reset();
                self.decoder.reset();
                self.set_state(ConnectionState::Connected);
                tracing::info!("Connected to {port} ({})", self.line_settings);
                Ok(())
            },
            Err(source) => {
                tracing::warn!("Failed to open {port}: {source}");
                self.set_state(ConnectionState::Disconnected);
                let err = ConnectionError::Open { port, source: Box::new(source) };
                self.report_error(&err.to_string());
                Err(err)
            },
        }
    }

    /// Close the port. Idempotent; a partial inbound frame is discarded.
    pub fn disconnect(&mut self) {
        self.transport.close();
        self.framer.reset();
        self.decoder.reset();

        if self.state != ConnectionState::Disconnected {
            tracing::info!("Disconnected from {}", self.port.as_deref().unwrap_or("None"));
            self.set_state(ConnectionState::Disconnected);
        }
    }

    /// Select a port. When connected, reconnects to the new port.
    pub fn set_port(&mut self, name: &str) -> Result<(), ConnectionError> {
        let name = (!name.is_empty()).then(|| name.to_string());
        if name == self.port {
            return Ok(());
        }

        let reconnect = self.state == ConnectionState::Connected;
        if reconnect {
            self.disconnect();
        }

        self.port = name;
        self.refresh_status();

        if reconnect { self.connect() } else { Ok(()) }
    }

    /// Send `SOM + text + EOM`.
    ///
    /// The payload is always echoed as a write segment. When disconnected, or
    /// when the transport rejects the write, an error is reported as well.
    pub fn write(&mut self, text: &str) -> Result<(), WriteError> {
        let payload = format!("{}{text}{}", self.som, self.framer.eom());
        self.push_local(SegmentKind::WriteMessage, &payload);

        if self.state != ConnectionState::Connected {
            let err = WriteError::NotOpen;
            self.report_error(&err.to_string());
            return Err(err);
        }

        tracing::debug!("TX {}", hex::encode(payload.as_bytes()));
        if let Err(source) = self.transport.write(payload.as_bytes()) {
            let err = WriteError::Transport(Box::new(source));
            self.report_error(&err.to_string());
            return Err(err);
        }
        Ok(())
    }

    /// Handle one line of user input.
    ///
    /// Every line is recorded in the history, commands included.
    pub fn parse_input(&mut self, line: &str) {
        self.history.record(line);

        if let Some(escaped) = line.strip_prefix(ESCAPED_MARKER) {
            let _ = self.write(&format!("{COMMAND_MARKER}{escaped}"));
        } else if line.starts_with(COMMAND_MARKER) {
            command::process(self, line);
        } else {
            let _ = self.write(line);
        }
    }

    /// Execute a command line directly, without recording it in the history.
    pub fn process_command(&mut self, line: &str) {
        command::process(self, line);
    }

    /// Deliver bytes read from the transport.
    ///
    /// Dropped unless connected. Multi-byte characters split across reads are
    /// reassembled before framing.
    pub fn on_readable(&mut self, bytes: &[u8]) {
        if self.state != ConnectionState::Connected {
            tracing::trace!("Dropping {} bytes received while {}", bytes.len(), self.state.label());
            return;
        }

        tracing::debug!("RX {}", hex::encode(bytes));
        let text = self.decoder.decode(bytes);
        let events = self.framer.feed(&text);
        self.apply(events);
    }

    /// Apply rendering events to the display log.
    pub fn apply(&mut self, events: impl IntoIterator<Item = FrameEvent>) {
        let mut changed = false;
        for event in events {
            match event {
                FrameEvent::Append(text) => {
                    self.display.append(SegmentKind::ReadMessage, &text);
                    changed = true;
                },
                FrameEvent::Insert(text) => {
                    self.display.insert(&text);
                    changed = true;
                },
                FrameEvent::Clear => {
                    self.display.clear();
                    self.framer.interrupt();
                    changed = true;
                },
                FrameEvent::FrameBoundary => tracing::trace!("Frame boundary"),
            }
        }

        if changed {
            self.notify(Notification::DisplayChanged);
        }
    }

    /// Wipe the display log.
    pub fn clear_display(&mut self) {
        self.display.clear();
        self.framer.interrupt();
        self.notify(Notification::DisplayChanged);
    }

    /// Disconnect and ask the runtime to exit.
    pub fn quit(&mut self) {
        self.disconnect();
        self.should_quit = true;
    }

    /// Echo a command line.
    pub fn echo_command(&mut self, line: &str) {
        self.push_local(SegmentKind::Command, line);
    }

    /// Add a command output line.
    pub fn respond(&mut self, line: &str) {
        self.push_local(SegmentKind::CommandResponse, line);
    }

    /// Report a user-visible error in the log and the error text.
    pub fn report_error(&mut self, message: &str) {
        self.push_local(SegmentKind::Error, message);
        if self.error != message {
            self.error = message.to_string();
            self.notify(Notification::ErrorChanged);
        }
    }

    /// The transport closed on its own (device unplugged, hang-up).
    pub fn on_transport_closed(&mut self, reason: &str) {
        if self.state == ConnectionState::Disconnected {
            return;
        }

        tracing::warn!("Transport closed: {reason}");
        self.disconnect();
        self.report_error(reason);
    }

    /// Step back in the input history.
    pub fn prev_history(&mut self) -> Option<&str> {
        self.history.previous()
    }

    /// Step forward in the input history.
    pub fn next_history(&mut self) -> Option<&str> {
        self.history.next()
    }

    /// Stop browsing the input history.
    pub fn reset_history_cursor(&mut self) {
        self.history.reset_cursor();
    }

    /// Replace the end-of-message delimiter. Resets the framer.
    pub fn set_eom(&mut self, eom: &str) -> Result<(), ConfigError> {
        if eom == self.framer.eom() {
            return Ok(());
        }

        self.framer.set_eom(eom)?;
        self.notify(Notification::EomChanged);
        self.refresh_status();
        Ok(())
    }

    /// Replace the start-of-message prefix.
    pub fn set_som(&mut self, som: &str) {
        if som != self.som {
            self.som = som.to_string();
            self.notify(Notification::SomChanged);
        }
    }

    /// Replace the line parameters. Reopens the port when connected.
    pub fn set_line_settings(&mut self, line_settings: LineSettings) -> Result<(), ConnectionError> {
        if line_settings == self.line_settings {
            return Ok(());
        }

        self.line_settings = line_settings;
        self.refresh_status();

        if self.state == ConnectionState::Connected {
            self.disconnect();
            self.connect()
        } else {
            Ok(())
        }
    }

    /// Change the display bound, trimming immediately.
    pub fn set_max_display_chars(&mut self, max_chars: usize) -> Result<(), ConfigError> {
        let before = self.display.len();
        self.display.set_max_chars(max_chars)?;
        if self.display.len() != before {
            self.notify(Notification::DisplayChanged);
        }
        Ok(())
    }

    /// Store the latest port enumeration.
    ///
    /// With no port selected, the first listed port becomes the selection.
    pub fn set_available_ports(&mut self, ports: Vec<String>) {
        if ports == self.available_ports {
            return;
        }

        self.available_ports = ports;
        self.notify(Notification::PortsChanged);

        if self.port.is_none()
            && let Some(first) = self.available_ports.first()
        {
            self.port = Some(first.clone());
            self.refresh_status();
        }
    }

    /// Load persisted settings. Unparseable values keep the current value.
    pub fn restore_settings(&mut self, store: &impl SettingsStore) {
        let mut line_settings = self.line_settings;

        if let Some(value) = store.get(keys::BAUD_RATE) {
            match settings::parse_baud_rate(&value) {
                Ok(rate) => line_settings.baud_rate = rate,
                Err(err) => tracing::warn!("Ignoring stored setting: {err}"),
            }
        }
        restore_value(store, keys::DATA_BITS, &mut line_settings.data_bits);
        restore_value(store, keys::PARITY, &mut line_settings.parity);
        restore_value(store, keys::STOP_BITS, &mut line_settings.stop_bits);
        restore_value(store, keys::FLOW_CONTROL, &mut line_settings.flow_control);
        let _ = self.set_line_settings(line_settings);

        if let Some(eom) = store.get(keys::EOM)
            && let Err(err) = self.set_eom(&eom)
        {
            tracing::warn!("Ignoring stored {}: {err}", keys::EOM);
        }
        if let Some(som) = store.get(keys::SOM) {
            self.set_som(&som);
        }
        if let Some(port) = store.get(keys::PORT_NAME)
            && !port.is_empty()
        {
            let _ = self.set_port(&port);
        }
    }

    /// Persist the current settings.
    pub fn save_settings(&self, store: &mut impl SettingsStore) {
        let line = &self.line_settings;
        store.set(keys::BAUD_RATE, line.baud_rate.to_string());
        store.set(keys::DATA_BITS, line.data_bits.to_string());
        store.set(keys::PARITY, line.parity.to_string());
        store.set(keys::STOP_BITS, line.stop_bits.to_string());
        store.set(keys::FLOW_CONTROL, line.flow_control.to_string());
        store.set(keys::EOM, self.framer.eom());
        store.set(keys::SOM, self.som.clone());
        store.set(keys::PORT_NAME, self.port.clone().unwrap_or_default());
    }

    /// Drain pending change notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }

    /// Connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the port is open.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Selected port. `None` if nothing is selected.
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    /// End-of-message delimiter.
    pub fn eom(&self) -> String {
        self.framer.eom()
    }

    /// Start-of-message prefix.
    pub fn som(&self) -> &str {
        &self.som
    }

    /// Serial line parameters.
    pub fn line_settings(&self) -> &LineSettings {
        &self.line_settings
    }

    /// Display log.
    pub fn display(&self) -> &DisplayLog {
        &self.display
    }

    /// Input history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Inbound framer.
    pub fn framer(&self) -> &Framer {
        &self.framer
    }

    /// Registered commands.
    pub fn commands(&self) -> &CommandRegistry<T> {
        &self.commands
    }

    /// Latest port enumeration.
    pub fn available_ports(&self) -> &[String] {
        &self.available_ports
    }

    /// One-line connection summary.
    pub fn status_text(&self) -> &str {
        &self.status
    }

    /// Most recent user-visible error. Empty if none.
    pub fn error_text(&self) -> &str {
        &self.error
    }

    /// Whether `/quit` was executed.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Transport collaborator.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Transport collaborator, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn push_local(&mut self, kind: SegmentKind, text: &str) {
        self.display.append(kind, text);
        self.framer.interrupt();
        self.notify(Notification::DisplayChanged);
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }

        let was_connected = self.state == ConnectionState::Connected;
        self.state = state;
        if was_connected != (state == ConnectionState::Connected) {
            self.notify(Notification::ConnectionChanged);
        }
        self.refresh_status();
    }

    fn refresh_status(&mut self) {
        let status = format!(
            "{} {} {} {}",
            self.state.label(),
            self.port.as_deref().unwrap_or("None"),
            self.line_settings,
            settings::eom_label(&self.framer.eom()),
        );

        if status != self.status {
            self.status = status;
            self.notify(Notification::StatusChanged);
        }
    }

    fn notify(&mut self, notification: Notification) {
        if !self.notifications.contains(&notification) {
            self.notifications.push(notification);
        }
    }
}

fn restore_value<V>(store: &impl SettingsStore, key: &str, current: &mut V)
where
    V: std::str::FromStr<Err = ConfigError>,
{
    let Some(value) = store.get(key) else {
        return;
    };

    match value.parse() {
        Ok(parsed) => *current = parsed,
        Err(err) => tracing::warn!("Ignoring stored setting: {err}"),
    }
}
