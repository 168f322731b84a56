//! Session core for the yaterm serial terminal.
//!
//! Turns the raw byte stream of a character-oriented transport into a
//! user-facing session: framed messages, a bounded scrollback log, a small
//! command language and navigable input history. Everything here is sans-IO;
//! the transport, port discovery and settings persistence are collaborator
//! traits implemented elsewhere.
//!
//! # Components
//!
//! - [`Framer`]: end-of-message scanner, invariant under chunk boundaries
//! - [`DisplayLog`]: bounded, styled scrollback
//! - [`CommandRegistry`]: `/verb` dispatch to handler functions
//! - [`History`]: input history ring with browsing cursor
//! - [`Session`]: connection lifecycle and routing between all of the above

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod display;
mod error;
pub mod framer;
pub mod history;
pub mod session;
pub mod settings;
mod state;
mod transport;
mod utf8;

pub use command::{CommandRegistry, CommandSpec, Handler};
pub use display::{DisplayLog, Segment, SegmentKind};
pub use error::{BoxedError, CommandError, ConfigError, ConnectionError, WriteError};
pub use framer::{FrameEvent, Framer};
pub use history::History;
pub use session::{Session, SessionConfig};
pub use settings::{DataBits, FlowControl, LineSettings, Parity, SettingsStore, StopBits};
pub use state::{ConnectionState, Notification};
pub use transport::{PortEnumerator, Transport};
pub use utf8::Utf8Stream;
