//! Logging setup.
//!
//! The UI owns the terminal, so log output goes to a file. `RUST_LOG` wins
//! over `--log-level`. A bare level applies to the yaterm crates only and
//! keeps dependencies at `warn`; anything else is used as a filter directive.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Crates whose level `--log-level` controls.
const OWN_TARGETS: [&str; 3] = ["yaterm_core", "yaterm_serial", "yaterm_tui"];

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Logging could not be initialized.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log file could not be created.
    #[error("failed to open log file {path}: {source}")]
    Open {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// `--log-level` is not a valid filter.
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    Init(#[from] TryInitError),
}

/// Default log file location.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("yaterm")
        .join("yaterm.log")
}

/// Expand `--log-level` into filter directives.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        return level.to_string();
    }

    let level = level.to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Install the global subscriber writing to `path`.
pub fn init(path: &Path, level: &str) -> Result<(), LoggingError> {
    let open_error = |source| LoggingError::Open { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_error)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path).map_err(open_error)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(level))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false).with_target(true))
        .try_init()?;

    tracing::info!("Logging to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_targets_own_crates() {
        assert_eq!(
            filter_directives("debug"),
            "warn,yaterm_core=debug,yaterm_serial=debug,yaterm_tui=debug"
        );
        assert_eq!(
            filter_directives(" TRACE "),
            "warn,yaterm_core=trace,yaterm_serial=trace,yaterm_tui=trace"
        );
    }

    #[test]
    fn directives_pass_through() {
        assert_eq!(filter_directives("yaterm_core=trace,info"), "yaterm_core=trace,info");
    }

    #[test]
    fn expanded_directives_parse() {
        for level in LEVELS {
            assert!(EnvFilter::try_new(filter_directives(level)).is_ok(), "{level}");
        }
    }

    #[test]
    fn default_path_is_named_after_the_program() {
        let path = default_log_path();
        assert!(path.ends_with("yaterm/yaterm.log"));
    }
}
