//! Observable session state types.
//!
//! The presentation layer reads the session through accessors and learns what
//! changed from [`Notification`]s drained after each event.

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No port open.
    Disconnected,
    /// Open call in progress.
    Connecting,
    /// Port open.
    Connected,
}

impl ConnectionState {
    /// Label used in the status text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
        }
    }
}

/// Change notification for an observable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// Display log contents changed.
    DisplayChanged,
    /// Status text changed.
    StatusChanged,
    /// Error text changed.
    ErrorChanged,
    /// Connection flag changed.
    ConnectionChanged,
    /// End-of-message delimiter changed.
    EomChanged,
    /// Start-of-message prefix changed.
    SomChanged,
    /// Available port list changed.
    PortsChanged,
}
