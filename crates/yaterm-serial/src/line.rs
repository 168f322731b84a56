//! Mapping of [`LineSettings`] onto termios flags.

use nix::sys::termios::{BaudRate, ControlFlags, InputFlags};
use yaterm_core::{DataBits, FlowControl, LineSettings, Parity, StopBits};

use crate::SerialError;

/// termios speed constant for `rate`.
pub fn baud_rate(rate: u32) -> Result<BaudRate, SerialError> {
    let baud = match rate {
        50 => BaudRate::B50,
        75 => BaudRate::B75,
        110 => BaudRate::B110,
        134 => BaudRate::B134,
        150 => BaudRate::B150,
        200 => BaudRate::B200,
        300 => BaudRate::B300,
        600 => BaudRate::B600,
        1200 => BaudRate::B1200,
        1800 => BaudRate::B1800,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115_200 => BaudRate::B115200,
        230_400 => BaudRate::B230400,
        460_800 => BaudRate::B460800,
        500_000 => BaudRate::B500000,
        921_600 => BaudRate::B921600,
        1_000_000 => BaudRate::B1000000,
        other => return Err(SerialError::UnsupportedBaudRate(other)),
    };
    Ok(baud)
}

/// Character size, parity, stop bit and hardware flow control flags.
///
/// These replace the `CSIZE | PARENB | PARODD | CSTOPB | CRTSCTS` bits of the
/// current control flags.
pub fn character_flags(settings: &LineSettings) -> Result<ControlFlags, SerialError> {
    let mut flags = match settings.data_bits {
        DataBits::Five => ControlFlags::CS5,
        DataBits::Six => ControlFlags::CS6,
        DataBits::Seven => ControlFlags::CS7,
        DataBits::Eight => ControlFlags::CS8,
    };

    match settings.parity {
        Parity::None => {},
        Parity::Even => flags |= ControlFlags::PARENB,
        Parity::Odd => flags |= ControlFlags::PARENB | ControlFlags::PARODD,
    }

    match settings.stop_bits {
        StopBits::One => {},
        StopBits::Two => flags |= ControlFlags::CSTOPB,
        StopBits::OneAndHalf => return Err(SerialError::UnsupportedStopBits(settings.stop_bits)),
    }

    if settings.flow_control == FlowControl::Hardware {
        flags |= ControlFlags::CRTSCTS;
    }

    Ok(flags)
}

/// Input flags for software flow control.
pub fn flow_input_flags(flow_control: FlowControl) -> InputFlags {
    match flow_control {
        FlowControl::Software => InputFlags::IXON | InputFlags::IXOFF,
        FlowControl::None | FlowControl::Hardware => InputFlags::empty(),
    }
}

/// Bits owned by [`character_flags`].
pub(crate) fn character_mask() -> ControlFlags {
    ControlFlags::CSIZE
        | ControlFlags::PARENB
        | ControlFlags::PARODD
        | ControlFlags::CSTOPB
        | ControlFlags::CRTSCTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rates_are_supported() {
        for rate in yaterm_core::settings::STANDARD_BAUD_RATES {
            assert!(baud_rate(rate).is_ok(), "{rate}");
        }
        assert_eq!(baud_rate(115_200).unwrap(), BaudRate::B115200);
    }

    #[test]
    fn odd_rate_rejected() {
        assert!(matches!(baud_rate(12345), Err(SerialError::UnsupportedBaudRate(12345))));
    }

    #[test]
    fn eight_n_one() {
        let flags = character_flags(&LineSettings::default()).unwrap();
        assert_eq!(flags, ControlFlags::CS8);
    }

    #[test]
    fn seven_e_two_with_rts_cts() {
        let settings = LineSettings {
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
            flow_control: FlowControl::Hardware,
            ..LineSettings::default()
        };
        let flags = character_flags(&settings).unwrap();

        assert_eq!(
            flags,
            ControlFlags::CS7 | ControlFlags::PARENB | ControlFlags::CSTOPB | ControlFlags::CRTSCTS
        );
        assert!(character_mask().contains(flags));
    }

    #[test]
    fn odd_parity_sets_parodd() {
        let settings = LineSettings { parity: Parity::Odd, ..LineSettings::default() };
        assert!(character_flags(&settings).unwrap().contains(ControlFlags::PARODD));
    }

    #[test]
    fn one_and_half_stop_bits_unsupported() {
        let settings = LineSettings { stop_bits: StopBits::OneAndHalf, ..LineSettings::default() };
        assert!(matches!(
            character_flags(&settings),
            Err(SerialError::UnsupportedStopBits(StopBits::OneAndHalf))
        ));
    }

    #[test]
    fn software_flow_uses_xon_xoff() {
        assert_eq!(flow_input_flags(FlowControl::Software), InputFlags::IXON | InputFlags::IXOFF);
        assert!(flow_input_flags(FlowControl::Hardware).is_empty());
    }
}
