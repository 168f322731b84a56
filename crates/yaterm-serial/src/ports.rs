//! Serial port discovery through sysfs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use yaterm_core::PortEnumerator;

/// Default sysfs directory listing tty devices.
const SYS_CLASS_TTY: &str = "/sys/class/tty";

/// Lists tty devices backed by a hardware driver.
///
/// Virtual consoles and pseudoterminals have no `device/driver` link and are
/// skipped. Names are returned sorted, without the `/dev/` prefix.
#[derive(Debug, Clone)]
pub struct DevPorts {
    root: PathBuf,
}

impl Default for DevPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl DevPorts {
    /// Enumerator over the system sysfs tree.
    pub fn new() -> Self {
        Self::with_root(SYS_CLASS_TTY)
    }

    /// Enumerator over an alternative tree with the same layout.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn scan(&self) -> std::io::Result<Vec<String>> {
        let mut ports = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if has_driver(&entry.path()) {
                ports.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        ports.sort();
        Ok(ports)
    }
}

impl PortEnumerator for DevPorts {
    fn list_available_ports(&self) -> Vec<String> {
        match self.scan() {
            Ok(ports) => ports,
            Err(e) => {
                tracing::debug!("Port scan of {} failed: {e}", self.root.display());
                Vec::new()
            },
        }
    }
}

fn has_driver(tty: &Path) -> bool {
    tty.join("device").join("driver").exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_tty(root: &Path, name: &str, with_driver: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if with_driver {
            fs::create_dir_all(dir.join("device").join("driver")).unwrap();
        }
    }

    #[test]
    fn lists_only_driver_backed_ttys_sorted() {
        let root = tempfile::tempdir().unwrap();
        fake_tty(root.path(), "ttyUSB1", true);
        fake_tty(root.path(), "tty0", false);
        fake_tty(root.path(), "ttyACM0", true);
        fake_tty(root.path(), "ttyUSB0", true);

        let ports = DevPorts::with_root(root.path()).list_available_ports();

        assert_eq!(ports, vec!["ttyACM0", "ttyUSB0", "ttyUSB1"]);
    }

    #[test]
    fn missing_root_yields_no_ports() {
        let root = tempfile::tempdir().unwrap();
        let ports = DevPorts::with_root(root.path().join("absent")).list_available_ports();

        assert!(ports.is_empty());
    }
}
