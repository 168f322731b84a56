//! Collaborator traits for the byte transport and port discovery.
//!
//! The session never performs I/O itself. A frontend supplies a [`Transport`]
//! (a real serial device, or a simulation in tests) and delivers inbound
//! bytes by calling [`crate::Session::on_readable`] from its event loop.

use crate::LineSettings;

/// Character-oriented byte transport.
///
/// All methods must return promptly. Asynchronous completion (inbound data,
/// hang-ups) is reported back to the session by the frontend.
pub trait Transport {
    /// Transport-specific error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open `port` with the given line parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be opened or configured.
    fn open(&mut self, port: &str, settings: &LineSettings) -> Result<(), Self::Error>;

    /// Close the port. Idempotent.
    fn close(&mut self);

    /// Write bytes to the open port.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is closed or the write fails.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Whether a port is currently open.
    fn is_open(&self) -> bool;
}

/// Lists the serial ports that could be opened.
pub trait PortEnumerator {
    /// Names of available ports, in display order.
    fn list_available_ports(&self) -> Vec<String>;
}
