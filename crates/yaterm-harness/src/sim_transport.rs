//! In-memory transport.
//!
//! `SimTransport` records every call instead of touching a device. Tests
//! decide which ports exist and which operations fail, then inspect what the
//! session wrote.

use std::collections::BTreeSet;

use thiserror::Error;
use yaterm_core::{LineSettings, Transport};

/// Failure injected by [`SimTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Port is not in the simulated device list.
    #[error("No such device: {0}")]
    NoSuchPort(String),

    /// Port exists but refuses to open.
    #[error("Permission denied: {0}")]
    Refused(String),

    /// Write while closed.
    #[error("Port is not open")]
    NotOpen,

    /// Injected write failure.
    #[error("Input/output error")]
    WriteFailed,
}

/// Simulated serial transport.
#[derive(Debug, Clone, Default)]
pub struct SimTransport {
    /// Ports that can be opened. `None` accepts any name.
    devices: Option<BTreeSet<String>>,
    refused: BTreeSet<String>,
    fail_writes: bool,
    open_port: Option<String>,
    last_settings: Option<LineSettings>,
    writes: Vec<Vec<u8>>,
    open_calls: usize,
    close_calls: usize,
    write_calls: usize,
}

impl SimTransport {
    /// Transport that opens any port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that only opens the listed ports.
    pub fn with_devices<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { devices: Some(devices.into_iter().map(Into::into).collect()), ..Self::default() }
    }

    /// Make `port` refuse to open.
    pub fn refuse(&mut self, port: &str) {
        self.refused.insert(port.to_string());
    }

    /// Make every following write fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Simulate the device disappearing.
    pub fn unplug(&mut self) {
        self.open_port = None;
    }

    /// Port currently open.
    pub fn open_port(&self) -> Option<&str> {
        self.open_port.as_deref()
    }

    /// Line settings of the most recent successful open.
    pub fn last_settings(&self) -> Option<&LineSettings> {
        self.last_settings.as_ref()
    }

    /// Payloads accepted by `write`, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All accepted payloads concatenated and decoded lossily.
    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.writes.concat()).into_owned()
    }

    /// Number of `open` calls, successful or not.
    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    /// Number of `close` calls.
    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    /// Number of `write` calls, successful or not.
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl Transport for SimTransport {
    type Error = SimError;

    fn open(&mut self, port: &str, settings: &LineSettings) -> Result<(), SimError> {
        self.open_calls += 1;

        if let Some(devices) = &self.devices
            && !devices.contains(port)
        {
            return Err(SimError::NoSuchPort(port.to_string()));
        }
        if self.refused.contains(port) {
            return Err(SimError::Refused(port.to_string()));
        }

        tracing::trace!("sim: open {port}");
        self.open_port = Some(port.to_string());
        self.last_settings = Some(*settings);
        Ok(())
    }

    fn close(&mut self) {
        self.close_calls += 1;
        self.open_port = None;
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        self.write_calls += 1;

        if self.open_port.is_none() {
            return Err(SimError::NotOpen);
        }
        if self.fail_writes {
            return Err(SimError::WriteFailed);
        }

        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open_port.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_respects_device_list() {
        let mut transport = SimTransport::with_devices(["ttyUSB0"]);
        let settings = LineSettings::default();

        assert_eq!(transport.open("ttyS9", &settings), Err(SimError::NoSuchPort("ttyS9".into())));
        assert!(!transport.is_open());

        assert_eq!(transport.open("ttyUSB0", &settings), Ok(()));
        assert_eq!(transport.open_port(), Some("ttyUSB0"));
        assert_eq!(transport.open_calls(), 2);
    }

    #[test]
    fn writes_require_open_port() {
        let mut transport = SimTransport::new();
        assert_eq!(transport.write(b"x"), Err(SimError::NotOpen));

        transport.open("any", &LineSettings::default()).unwrap();
        transport.write(b"ab").unwrap();
        transport.write(b"c").unwrap();
        assert_eq!(transport.written_text(), "abc");

        transport.set_fail_writes(true);
        assert_eq!(transport.write(b"d"), Err(SimError::WriteFailed));
        assert_eq!(transport.writes().len(), 2);
        assert_eq!(transport.write_calls(), 4);
    }

    #[test]
    fn refused_port_stays_closed() {
        let mut transport = SimTransport::new();
        transport.refuse("ttyACM0");

        assert!(transport.open("ttyACM0", &LineSettings::default()).is_err());
        assert_eq!(transport.open_port(), None);
    }
}
