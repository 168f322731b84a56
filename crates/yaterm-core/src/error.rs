//! Session error types.
//!
//! Every user-visible failure is recoverable: the session reports it as an
//! error segment in the display log, updates its error text and stays in a
//! well-defined state. Only [`ConfigError`] is returned before a session
//! exists, from constructors and setters.

use thiserror::Error;

/// Boxed error from a transport collaborator.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid configuration. Fatal at construction, rejected by setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// End-of-message delimiter must contain at least one character.
    #[error("end-of-message delimiter must not be empty")]
    EmptyEom,

    /// Display log must retain at least one character.
    #[error("maximum display length must be positive")]
    ZeroDisplayLength,

    /// A line setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Opening the transport failed. The session stays disconnected.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// No port has been selected.
    #[error("No port selected")]
    NoPort,

    /// The transport refused to open the port.
    #[error("Connect attempt failed: {port}: {source}")]
    Open {
        /// Port that failed to open.
        port: String,
        /// Transport failure.
        #[source]
        source: BoxedError,
    },
}

/// Writing to the transport failed. The outgoing message is still echoed.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Write attempted while disconnected.
    #[error("Port is not open")]
    NotOpen,

    /// The transport rejected the write.
    #[error("Write failed: {0}")]
    Transport(#[source] BoxedError),
}

/// A command line could not be executed.
///
/// Display strings are the exact text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Verb is not in the registry.
    #[error("Invalid command.")]
    InvalidCommand {
        /// Verb as typed, including the marker.
        verb: String,
    },

    /// Required argument missing.
    #[error("Wrong number of arguments")]
    WrongArgumentCount {
        /// Verb that was invoked.
        verb: &'static str,
    },

    /// `/help` was asked about a verb that does not exist.
    #[error("Unknown command.")]
    UnknownHelpTopic {
        /// Requested topic.
        topic: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_facing_messages() {
        assert_eq!(WriteError::NotOpen.to_string(), "Port is not open");
        assert_eq!(
            CommandError::InvalidCommand { verb: "/bogus".into() }.to_string(),
            "Invalid command."
        );
        assert_eq!(
            CommandError::UnknownHelpTopic { topic: "nope".into() }.to_string(),
            "Unknown command."
        );
    }

    #[test]
    fn connection_error_keeps_source() {
        let source: BoxedError = "no such device".into();
        let err = ConnectionError::Open { port: "ttyUSB0".into(), source };

        assert_eq!(err.to_string(), "Connect attempt failed: ttyUSB0: no such device");
        assert!(std::error::Error::source(&err).is_some());
    }
}
