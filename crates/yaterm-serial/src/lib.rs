//! Serial port collaborators for yaterm.
//!
//! - [`SerialTransport`]: opens a tty device, configures it with termios and
//!   forwards everything it reads to the runtime as [`SerialEvent`]s
//! - [`DevPorts`]: lists serial devices registered under `/sys/class/tty`
//!
//! Reads happen on a dedicated thread per open port. The thread never touches
//! session state; it only sends byte chunks through a channel, tagged with the
//! generation of the open call that spawned it so the runtime can drop data
//! from a port that has since been closed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod line;
mod ports;
mod transport;

pub use error::SerialError;
pub use line::{baud_rate, character_flags, flow_input_flags};
pub use ports::DevPorts;
pub use transport::{SerialEvent, SerialTransport, device_path};
