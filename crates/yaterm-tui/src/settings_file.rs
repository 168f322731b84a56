//! Settings persisted as a TOML file.
//!
//! Keys of the form `section/name` become `name` entries of a `[section]`
//! table. Values are kept as strings; hand-edited numbers or booleans are
//! read back in their TOML spelling.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use toml::{Table, Value};
use yaterm_core::SettingsStore;

/// Section for keys without a `/`.
const DEFAULT_SECTION: &str = "general";

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Settings file errors.
#[derive(Debug, Error)]
pub enum SettingsFileError {
    /// File exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// File is not valid TOML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// File could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// [`SettingsStore`] backed by a TOML file.
///
/// Without a path the store lives in memory only and `save` is a no-op.
#[derive(Debug, Clone, Default)]
pub struct TomlSettings {
    path: Option<PathBuf>,
    sections: Sections,
}

impl TomlSettings {
    /// `<config dir>/yaterm/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yaterm").join("settings.toml"))
    }

    /// Store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `path`. A missing file yields an empty store bound to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsFileError> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {}", path.display());
                return Ok(Self { path: Some(path), sections: Sections::new() });
            },
            Err(source) => return Err(SettingsFileError::Read { path, source }),
        };

        let table = match content.parse::<Table>() {
            Ok(table) => table,
            Err(source) => return Err(SettingsFileError::Parse { path, source }),
        };

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(Self { path: Some(path), sections: sections_from(table) })
    }

    /// Write the store back to its file, creating parent directories.
    pub fn save(&self) -> Result<(), SettingsFileError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = toml::to_string_pretty(&self.sections)?;
        let write_error = |source| SettingsFileError::Write { path: path.clone(), source };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)?;

        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SettingsStore for TomlSettings {
    fn get(&self, key: &str) -> Option<String> {
        let (section, name) = split_key(key);
        self.sections.get(section)?.get(name).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        let (section, name) = split_key(key);
        self.sections.entry(section.to_string()).or_default().insert(name.to_string(), value);
    }
}

fn split_key(key: &str) -> (&str, &str) {
    key.split_once('/').unwrap_or((DEFAULT_SECTION, key))
}

fn sections_from(table: Table) -> Sections {
    let mut sections = Sections::new();

    for (key, value) in table {
        match value {
            Value::Table(entries) => {
                let section = sections.entry(key).or_default();
                for (name, value) in entries {
                    section.insert(name, scalar_text(value));
                }
            },
            other => {
                let section = sections.entry(DEFAULT_SECTION.to_string()).or_default();
                section.insert(key, scalar_text(other));
            },
        }
    }
    sections
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
