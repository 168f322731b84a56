//! Serial line parameters and the persistent settings contract.
//!
//! Settings are persisted as string key/value pairs through a
//! [`SettingsStore`]. The store is opaque: the session only knows the keys
//! below and how to render and parse each value.

use std::{fmt, str::FromStr};

use crate::error::ConfigError;

/// Baud rates offered to the user.
pub const STANDARD_BAUD_RATES: [u32; 8] = [1200, 2400, 4800, 9600, 19200, 38400, 57600, 115_200];

/// Setting keys.
pub mod keys {
    /// Baud rate, decimal.
    pub const BAUD_RATE: &str = "port/baudrate";
    /// Data bits, `5` to `8`.
    pub const DATA_BITS: &str = "port/databits";
    /// Parity, `None`, `Even` or `Odd`.
    pub const PARITY: &str = "port/parity";
    /// Stop bits, `1`, `1.5` or `2`.
    pub const STOP_BITS: &str = "port/stopbits";
    /// Flow control, `None`, `Hardware` or `Software`.
    pub const FLOW_CONTROL: &str = "port/flowcontrol";
    /// End-of-message delimiter.
    pub const EOM: &str = "port/eom";
    /// Start-of-message prefix.
    pub const SOM: &str = "port/som";
    /// Last selected port.
    pub const PORT_NAME: &str = "port/name";
}

/// Opaque key/value persistence.
pub trait SettingsStore {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: String);
}

/// Bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataBits {
    /// 5 bits.
    Five,
    /// 6 bits.
    Six,
    /// 7 bits.
    Seven,
    /// 8 bits.
    #[default]
    Eight,
}

/// Parity checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StopBits {
    /// 1 stop bit.
    #[default]
    One,
    /// 1.5 stop bits.
    OneAndHalf,
    /// 2 stop bits.
    Two,
}

/// Flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlowControl {
    /// No flow control.
    #[default]
    None,
    /// RTS/CTS.
    Hardware,
    /// XON/XOFF.
    Software,
}

/// Complete serial line configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSettings {
    /// Baud rate.
    pub baud_rate: u32,
    /// Bits per character.
    pub data_bits: DataBits,
    /// Parity.
    pub parity: Parity,
    /// Stop bits.
    pub stop_bits: StopBits,
    /// Flow control.
    pub flow_control: FlowControl,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            flow_control: FlowControl::default(),
        }
    }
}

impl fmt::Display for LineSettings {
    /// Compact form, e.g. `115200 8N1 None`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self.parity {
            Parity::None => "N",
            Parity::Even => "E",
            Parity::Odd => "O",
        };
        write!(f, "{} {}{parity}{} {}", self.baud_rate, self.data_bits, self.stop_bits, self.flow_control)
    }
}

/// Parse a baud rate value.
pub fn parse_baud_rate(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|rate| *rate > 0)
        .ok_or_else(|| ConfigError::InvalidSetting { key: keys::BAUD_RATE, value: value.to_string() })
}

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = match self {
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
        };
        f.write_str(bits)
    }
}

impl FromStr for DataBits {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(Self::Five),
            "6" => Ok(Self::Six),
            "7" => Ok(Self::Seven),
            "8" => Ok(Self::Eight),
            other => Err(ConfigError::InvalidSetting { key: keys::DATA_BITS, value: other.to_string() }),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parity = match self {
            Self::None => "None",
            Self::Even => "Even",
            Self::Odd => "Odd",
        };
        f.write_str(parity)
    }
}

impl FromStr for Parity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "None" | "none" | "N" | "n" => Ok(Self::None),
            "Even" | "even" | "E" | "e" => Ok(Self::Even),
            "Odd" | "odd" | "O" | "o" => Ok(Self::Odd),
            other => Err(ConfigError::InvalidSetting { key: keys::PARITY, value: other.to_string() }),
        }
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = match self {
            Self::One => "1",
            Self::OneAndHalf => "1.5",
            Self::Two => "2",
        };
        f.write_str(bits)
    }
}

impl FromStr for StopBits {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.0" => Ok(Self::One),
            "1.5" => Ok(Self::OneAndHalf),
            "2" | "2.0" => Ok(Self::Two),
            other => Err(ConfigError::InvalidSetting { key: keys::STOP_BITS, value: other.to_string() }),
        }
    }
}

impl fmt::Display for FlowControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flow = match self {
            Self::None => "None",
            Self::Hardware => "Hardware",
            Self::Software => "Software",
        };
        f.write_str(flow)
    }
}

impl FromStr for FlowControl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "None" | "none" => Ok(Self::None),
            "Hardware" | "hardware" | "rtscts" => Ok(Self::Hardware),
            "Software" | "software" | "xonxoff" => Ok(Self::Software),
            other => {
                Err(ConfigError::InvalidSetting { key: keys::FLOW_CONTROL, value: other.to_string() })
            },
        }
    }
}

/// Short label for the common delimiters, `-` for anything else.
pub fn eom_label(eom: &str) -> &'static str {
    match eom {
        "\r" => "CR",
        "\n" => "LF",
        "\r\n" => "CR+LF",
        _ => "-",
    }
}
