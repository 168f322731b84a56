//! Generated session operations.
//!
//! Each [`SessionOp`] is one thing a user or the device can do. Sequences of
//! them are generated by proptest strategies and by the fuzzer, applied to a
//! [`sim_session`], and checked against the invariant registry after every
//! step.

use arbitrary::Arbitrary;
use yaterm_core::{ConfigError, Session, SessionConfig, Transport};

use crate::SimTransport;

/// Ports known to the simulated device. The last one refuses to open.
pub const SIM_PORTS: [&str; 3] = ["ttyUSB0", "ttyUSB1", "ttyACM0"];

/// Choice of end-of-message delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum EomChoice {
    /// `\r`
    Cr,
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// Anything, including the empty string.
    Custom(String),
}

impl EomChoice {
    /// Delimiter text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cr => "\r",
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Custom(eom) => eom,
        }
    }
}

/// Built-in command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum CommandOp {
    /// `/clear`
    Clear,
    /// `/connect <port>`
    Connect(u8),
    /// `/connect` without argument
    ConnectNoPort,
    /// `/disconnect`
    Disconnect,
    /// `/help [topic]`
    Help(Option<String>),
    /// `/quit`
    Quit,
    /// Unregistered verb.
    Unknown(String),
}

impl CommandOp {
    /// Command line as typed.
    pub fn line(&self) -> String {
        match self {
            Self::Clear => "/clear".to_string(),
            Self::Connect(index) => format!("/connect {}", port_name(*index)),
            Self::ConnectNoPort => "/connect".to_string(),
            Self::Disconnect => "/disconnect".to_string(),
            Self::Help(None) => "/help".to_string(),
            Self::Help(Some(topic)) => format!("/help {topic}"),
            Self::Quit => "/quit".to_string(),
            Self::Unknown(verb) => format!("/x{verb}"),
        }
    }
}

/// One operation on a session.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum SessionOp {
    /// Submit a typed line.
    Input(String),
    /// Submit a command line.
    Command(CommandOp),
    /// Bytes arrive from the device.
    Readable(Vec<u8>),
    /// Open the selected port.
    Connect,
    /// Close the port.
    Disconnect,
    /// Select a port by index into [`SIM_PORTS`].
    SelectPort(u8),
    /// Change the delimiter.
    SetEom(EomChoice),
    /// Change the write prefix.
    SetSom(String),
    /// History up.
    PrevHistory,
    /// History down.
    NextHistory,
    /// Leave history browsing.
    ResetHistory,
    /// Device disappears while open.
    Unplug,
    /// Make writes fail or succeed.
    FailWrites(bool),
    /// Change the display bound. Zero is rejected.
    SetMaxDisplay(u16),
}

impl SessionOp {
    /// Apply the operation. Failures are part of normal operation and are
    /// surfaced by the session itself.
    pub fn apply(&self, session: &mut Session<SimTransport>) {
        match self {
            Self::Input(line) => session.parse_input(line),
            Self::Command(command) => session.parse_input(&command.line()),
            Self::Readable(bytes) => session.on_readable(bytes),
            Self::Connect => {
                let _ = session.connect();
            },
            Self::Disconnect => session.disconnect(),
            Self::SelectPort(index) => {
                let _ = session.set_port(port_name(*index));
            },
            Self::SetEom(eom) => {
                let _ = session.set_eom(eom.as_str());
            },
            Self::SetSom(som) => session.set_som(som),
            Self::PrevHistory => {
                session.prev_history();
            },
            Self::NextHistory => {
                session.next_history();
            },
            Self::ResetHistory => session.reset_history_cursor(),
            Self::Unplug => {
                if session.transport().is_open() {
                    session.transport_mut().unplug();
                    session.on_transport_closed("Device disconnected");
                }
            },
            Self::FailWrites(fail) => session.transport_mut().set_fail_writes(*fail),
            Self::SetMaxDisplay(max) => {
                let _ = session.set_max_display_chars(usize::from(*max));
            },
        }
    }
}

/// Port name for an arbitrary index.
pub fn port_name(index: u8) -> &'static str {
    SIM_PORTS[usize::from(index) % SIM_PORTS.len()]
}

/// Small session over a [`SimTransport`] that knows [`SIM_PORTS`].
///
/// Bounds are small so generated sequences reach eviction quickly.
pub fn sim_session() -> Result<Session<SimTransport>, ConfigError> {
    let mut transport = SimTransport::with_devices(SIM_PORTS);
    transport.refuse(SIM_PORTS[2]);

    Session::new(transport, SessionConfig {
        port: Some(SIM_PORTS[0].to_string()),
        eom: "\r\n".to_string(),
        max_display_chars: 256,
        history_len: 8,
        ..SessionConfig::default()
    })
}
