//! Command-line configuration.
//!
//! Flags override whatever the settings file restored. Delimiters accept
//! C-style escapes so `--eom '\r\n'` works from a shell.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use yaterm_core::{
    DataBits, FlowControl, Parity, Session, SessionConfig, StopBits, Transport,
    display::DEFAULT_MAX_DISPLAY_CHARS, history::DEFAULT_HISTORY_LEN, settings::parse_baud_rate,
};

use crate::runtime::RuntimeError;

/// Serial port terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "yaterm")]
#[command(about = "Terminal for line-oriented serial devices")]
#[command(version)]
pub struct Args {
    /// Port to select, e.g. `ttyUSB0` or `/dev/serial/by-id/...`
    #[arg(short, long)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, value_parser = parse_baud_rate)]
    pub baud: Option<u32>,

    /// Data bits (5-8)
    #[arg(long)]
    pub data_bits: Option<DataBits>,

    /// Parity (None, Even, Odd)
    #[arg(long)]
    pub parity: Option<Parity>,

    /// Stop bits (1, 2)
    #[arg(long)]
    pub stop_bits: Option<StopBits>,

    /// Flow control (None, Hardware, Software)
    #[arg(long)]
    pub flow_control: Option<FlowControl>,

    /// End-of-message delimiter, e.g. '\r\n'
    #[arg(long, value_parser = decode_escapes)]
    pub eom: Option<String>,

    /// Start-of-message prefix for outgoing lines
    #[arg(long, value_parser = decode_escapes)]
    pub som: Option<String>,

    /// Characters kept in the scrollback
    #[arg(long, default_value_t = DEFAULT_MAX_DISPLAY_CHARS)]
    pub max_chars: usize,

    /// Lines kept in the input history
    #[arg(long, default_value_t = DEFAULT_HISTORY_LEN)]
    pub history: usize,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Log file (defaults to the user data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Open the port right after startup
    #[arg(short, long)]
    pub connect: bool,
}

impl Args {
    /// Session construction parameters that cannot change later.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_display_chars: self.max_chars,
            history_len: self.history,
            ..SessionConfig::default()
        }
    }

    /// Apply flag overrides on top of the restored settings.
    pub fn apply<T: Transport>(&self, session: &mut Session<T>) -> Result<(), RuntimeError> {
        let mut line = *session.line_settings();
        if let Some(baud) = self.baud {
            line.baud_rate = baud;
        }
        if let Some(data_bits) = self.data_bits {
            line.data_bits = data_bits;
        }
        if let Some(parity) = self.parity {
            line.parity = parity;
        }
        if let Some(stop_bits) = self.stop_bits {
            line.stop_bits = stop_bits;
        }
        if let Some(flow_control) = self.flow_control {
            line.flow_control = flow_control;
        }
        session.set_line_settings(line)?;

        if let Some(eom) = &self.eom {
            session.set_eom(eom)?;
        }
        if let Some(som) = &self.som {
            session.set_som(som);
        }
        if let Some(port) = &self.port {
            session.set_port(port)?;
        }
        Ok(())
    }
}

/// Malformed escape sequence in a delimiter argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    /// Backslash at the end of the input.
    #[error("dangling backslash")]
    Dangling,

    /// Backslash followed by an unsupported character.
    #[error("unknown escape \\{0}")]
    Unknown(char),

    /// `\x` not followed by two hex digits.
    #[error("invalid hex escape \\x{0}")]
    InvalidHex(String),
}

/// Decode `\r`, `\n`, `\t`, `\\`, `\0` and `\xNN` escapes.
pub fn decode_escapes(input: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next().ok_or(EscapeError::Dangling)? {
            'r' => out.push('\r'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            'x' => {
                let digits: String = chars.by_ref().take(2).collect();
                let byte = (digits.len() == 2)
                    .then(|| u8::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .filter(u8::is_ascii)
                    .ok_or_else(|| EscapeError::InvalidHex(digits.clone()))?;
                out.push(char::from(byte));
            },
            other => return Err(EscapeError::Unknown(other)),
        }
    }
    Ok(out)
}
