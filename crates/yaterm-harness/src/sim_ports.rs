//! Scripted port enumeration.

use yaterm_core::PortEnumerator;

/// Port list that tests change between polls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimPorts {
    ports: Vec<String>,
}

impl SimPorts {
    /// Enumerator reporting `ports`.
    pub fn new<I, S>(ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { ports: ports.into_iter().map(Into::into).collect() }
    }

    /// Simulate a device appearing.
    pub fn plug(&mut self, port: &str) {
        if !self.ports.iter().any(|p| p == port) {
            self.ports.push(port.to_string());
        }
    }

    /// Simulate a device disappearing.
    pub fn unplug(&mut self, port: &str) {
        self.ports.retain(|p| p != port);
    }
}

impl PortEnumerator for SimPorts {
    fn list_available_ports(&self) -> Vec<String> {
        self.ports.clone()
    }
}
