//! Serial transport errors.

use std::io;

use thiserror::Error;
use yaterm_core::StopBits;

/// Failure opening, configuring or writing a serial device.
#[derive(Debug, Error)]
pub enum SerialError {
    /// Device I/O failed.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// termios call failed.
    #[error("System error: {0}")]
    Nix(#[from] nix::Error),

    /// Baud rate has no termios constant.
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    /// Stop bit setting cannot be expressed with termios.
    #[error("Unsupported stop bits: {0}")]
    UnsupportedStopBits(StopBits),

    /// Write attempted with no port open.
    #[error("Port is not open")]
    NotOpen,
}
