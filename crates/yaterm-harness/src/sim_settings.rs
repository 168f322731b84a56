//! In-memory settings store.

use std::collections::BTreeMap;

use yaterm_core::SettingsStore;

/// Settings kept in a map, for tests that persist and restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySettings {
    values: BTreeMap<String, String>,
}

impl MemorySettings {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `pairs`.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self { values }
    }

    /// Stored keys and values, sorted by key.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}
