//! tty device transport.

use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    os::{
        fd::AsRawFd,
        unix::fs::OpenOptionsExt,
    },
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use nix::{
    fcntl::{FcntlArg, OFlag, fcntl},
    sys::termios::{self, SetArg, SpecialCharacterIndices},
};
use tokio::sync::mpsc;
use yaterm_core::{LineSettings, Transport};

use crate::{
    SerialError,
    line::{baud_rate, character_flags, character_mask, flow_input_flags},
};

/// Read buffer size of the reader thread.
const READ_CHUNK: usize = 4096;

/// Reader wake-up interval, in tenths of a second (termios `VTIME`).
const READ_TIMEOUT_DECISECONDS: u8 = 1;

/// Event sent by the reader thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialEvent {
    /// Bytes read from the device.
    Data {
        /// Open call that produced this reader.
        generation: u64,
        /// Raw bytes.
        bytes: Vec<u8>,
    },
    /// The device went away or a read failed. The reader has stopped.
    Closed {
        /// Open call that produced this reader.
        generation: u64,
        /// Human-readable cause.
        reason: String,
    },
}

impl SerialEvent {
    /// Open call the event belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            Self::Data { generation, .. } | Self::Closed { generation, .. } => *generation,
        }
    }
}

struct OpenPort {
    name: String,
    file: File,
    stop: Arc<AtomicBool>,
}

/// Serial transport over a tty device.
pub struct SerialTransport {
    port: Option<OpenPort>,
    events: mpsc::UnboundedSender<SerialEvent>,
    generation: u64,
}

impl SerialTransport {
    /// Create a closed transport and the receiver for its reader events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SerialEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { port: None, events, generation: 0 }, rx)
    }

    /// Generation of the current (or most recent) open call.
    ///
    /// Events carrying another generation come from a reader whose port has
    /// been closed since and must be ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Name of the open port.
    pub fn port_name(&self) -> Option<&str> {
        self.port.as_ref().map(|port| port.name.as_str())
    }

    fn open_device(&mut self, name: &str, settings: &LineSettings) -> Result<(), SerialError> {
        let path = device_path(name);

        // O_NONBLOCK keeps open() from waiting for carrier detect.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags((OFlag::O_NOCTTY | OFlag::O_NONBLOCK).bits())
            .open(&path)?;

        configure(&file, settings)?;
        set_blocking(&file)?;

        let reader = file.try_clone()?;
        let stop = Arc::new(AtomicBool::new(false));

        self.generation += 1;
        let generation = self.generation;
        let events = self.events.clone();
        let thread_stop = Arc::clone(&stop);
        thread::Builder::new()
            .name(format!("yaterm-reader-{name}"))
            .spawn(move || read_loop(reader, &path, generation, &thread_stop, &events))?;

        self.port = Some(OpenPort { name: name.to_string(), file, stop });
        Ok(())
    }
}

impl Transport for SerialTransport {
    type Error = SerialError;

    fn open(&mut self, port: &str, settings: &LineSettings) -> Result<(), SerialError> {
        self.close();
        tracing::debug!("Opening {port} ({settings})");
        self.open_device(port, settings)
    }

    fn close(&mut self) {
        if let Some(port) = self.port.take() {
            tracing::debug!("Closing {}", port.name);
            port.stop.store(true, Ordering::Relaxed);
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;
        port.file.write_all(bytes)?;
        port.file.flush()?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// Absolute device path for a port name. Bare names live under `/dev`.
pub fn device_path(name: &str) -> PathBuf {
    if name.starts_with('/') { PathBuf::from(name) } else { Path::new("/dev").join(name) }
}

/// Raw mode, requested line parameters, and reads that wake up every
/// `READ_TIMEOUT_DECISECONDS` so the reader can notice it was stopped.
fn configure(file: &File, settings: &LineSettings) -> Result<(), SerialError> {
    let mut tty = termios::tcgetattr(file)?;

    termios::cfmakeraw(&mut tty);
    termios::cfsetspeed(&mut tty, baud_rate(settings.baud_rate)?)?;

    tty.control_flags &= !character_mask();
    tty.control_flags |= character_flags(settings)?;
    tty.control_flags |= termios::ControlFlags::CREAD | termios::ControlFlags::CLOCAL;

    tty.input_flags &=
        !(termios::InputFlags::IXON | termios::InputFlags::IXOFF | termios::InputFlags::IXANY);
    tty.input_flags |= flow_input_flags(settings.flow_control);

    tty.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
    tty.control_chars[SpecialCharacterIndices::VTIME as usize] = READ_TIMEOUT_DECISECONDS;

    termios::tcsetattr(file, SetArg::TCSANOW, &tty)?;
    Ok(())
}

fn set_blocking(file: &File) -> Result<(), SerialError> {
    let fd = file.as_raw_fd();
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags & !OFlag::O_NONBLOCK))?;
    Ok(())
}

fn read_loop(
    mut file: File,
    path: &Path,
    generation: u64,
    stop: &AtomicBool,
    events: &mpsc::UnboundedSender<SerialEvent>,
) {
    let mut buf = [0u8; READ_CHUNK];

    while !stop.load(Ordering::Relaxed) {
        match file.read(&mut buf) {
            Ok(0) => {
                // VTIME expired. A vanished device node means the adapter was unplugged.
                if !path.exists() {
                    let reason = "Device disconnected".to_string();
                    let _ = events.send(SerialEvent::Closed { generation, reason });
                    break;
                }
            },
            Ok(n) => {
                let bytes = buf[..n].to_vec();
                if events.send(SerialEvent::Data { generation, bytes }).is_err() {
                    break;
                }
            },
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => {},
            Err(e) => {
                if !stop.load(Ordering::Relaxed) {
                    tracing::warn!("Read from {} failed: {e}", path.display());
                    let _ = events.send(SerialEvent::Closed { generation, reason: e.to_string() });
                }
                break;
            },
        }
    }

    tracing::debug!("Reader for {} stopped", path.display());
}
