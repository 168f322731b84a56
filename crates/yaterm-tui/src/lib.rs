//! Terminal UI for yaterm
//!
//! A thin shell over [`yaterm_core::Session`]: command-line flags, a TOML
//! settings file, file logging and a ratatui front end. The serial transport
//! comes from `yaterm-serial`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod settings_file;
pub mod ui;

pub use config::{Args, EscapeError, decode_escapes};
pub use input::{InputAction, InputState, KeyInput};
pub use runtime::{Runtime, RuntimeError};
pub use settings_file::{SettingsFileError, TomlSettings};
