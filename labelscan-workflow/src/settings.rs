//! Settings collaborator
//!
//! The workflow reads printer, label, delay, and operator settings through
//! `SettingsStore`. Reads happen at the moment of use - the delay when a
//! countdown is armed, printer/label/username when a print is submitted -
//! so settings changed mid-cycle are honored.

use serde_json::Value;
use shared::LabelSettings;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Well-known setting keys
pub mod keys {
    pub const SELECTED_PRINTER: &str = "selected_printer";
    pub const LABEL_SETTINGS: &str = "label_settings";
    pub const AUTO_PRINT_DELAY: &str = "auto_print_delay";
    pub const USERNAME: &str = "username";
}

/// Default auto-print delay in seconds
pub const DEFAULT_AUTO_PRINT_DELAY: u32 = 3;
/// Allowed auto-print delay range in seconds
pub const AUTO_PRINT_DELAY_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Settings store error type
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value settings collaborator
///
/// Raw `get`/`set` plus typed accessors with the defaults and clamping the
/// workflow relies on. Stored values may be strings where numbers are
/// expected (legacy stores kept everything as text), so the typed
/// accessors parse both.
pub trait SettingsStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);

    /// Selected printer, if any; `None` lets the server pick its default
    fn printer_name(&self) -> Option<String> {
        self.get(keys::SELECTED_PRINTER)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty())
    }

    /// Label crop/quality settings, falling back to defaults per field
    fn label_settings(&self) -> LabelSettings {
        self.get(keys::LABEL_SETTINGS)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Auto-print delay in seconds, clamped to the allowed range
    fn auto_print_delay(&self) -> u32 {
        let configured = self.get(keys::AUTO_PRINT_DELAY).and_then(|v| match v {
            Value::Number(n) => n.as_u64().map(|n| n as u32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        configured
            .unwrap_or(DEFAULT_AUTO_PRINT_DELAY)
            .clamp(*AUTO_PRINT_DELAY_RANGE.start(), *AUTO_PRINT_DELAY_RANGE.end())
    }

    /// Operator name attached to print jobs
    fn username(&self) -> String {
        self.get(keys::USERNAME)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Anonymous".to_string())
    }
}

/// In-memory settings store, for tests and embedders
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.write().unwrap().insert(key.to_string(), value);
    }
}

/// Settings persisted to a single JSON file
///
/// Loaded once on open; every `set` rewrites the file. A write failure is
/// logged and the in-memory value kept, so the workstation keeps running.
#[derive(Debug)]
pub struct JsonFileSettings {
    file_path: PathBuf,
    values: RwLock<HashMap<String, Value>>,
}

impl JsonFileSettings {
    /// Open the settings file, creating an empty store if it is missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let file_path = path.into();
        let values = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            file_path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self, values: &HashMap<String, Value>) -> Result<(), SettingsError> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut values = self.values.write().unwrap();
        values.insert(key.to_string(), value);
        if let Err(e) = self.persist(&values) {
            tracing::warn!(path = %self.file_path.display(), "failed to persist settings: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delay_defaults_and_clamps() {
        let store = MemorySettings::new();
        assert_eq!(store.auto_print_delay(), 3);

        store.set(keys::AUTO_PRINT_DELAY, json!(7));
        assert_eq!(store.auto_print_delay(), 7);

        // Legacy stores kept the delay as a string
        store.set(keys::AUTO_PRINT_DELAY, json!("5"));
        assert_eq!(store.auto_print_delay(), 5);

        store.set(keys::AUTO_PRINT_DELAY, json!(0));
        assert_eq!(store.auto_print_delay(), 1);
        store.set(keys::AUTO_PRINT_DELAY, json!(60));
        assert_eq!(store.auto_print_delay(), 10);
        store.set(keys::AUTO_PRINT_DELAY, json!("not a number"));
        assert_eq!(store.auto_print_delay(), 3);
    }

    #[test]
    fn typed_accessors_fall_back() {
        let store = MemorySettings::new();
        assert_eq!(store.printer_name(), None);
        assert_eq!(store.username(), "Anonymous");
        assert_eq!(store.label_settings(), LabelSettings::default());

        store.set(keys::SELECTED_PRINTER, json!(""));
        assert_eq!(store.printer_name(), None);

        store.set(keys::SELECTED_PRINTER, json!("Zebra-GK420d"));
        store.set(keys::USERNAME, json!("maria"));
        store.set(keys::LABEL_SETTINGS, json!({"width": 2.0}));
        assert_eq!(store.printer_name().as_deref(), Some("Zebra-GK420d"));
        assert_eq!(store.username(), "maria");
        assert_eq!(store.label_settings().width, 2.0);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonFileSettings::open(&path).unwrap();
        store.set(keys::SELECTED_PRINTER, json!("Zebra-GK420d"));
        store.set(keys::AUTO_PRINT_DELAY, json!(5));

        let reopened = JsonFileSettings::open(&path).unwrap();
        assert_eq!(reopened.printer_name().as_deref(), Some("Zebra-GK420d"));
        assert_eq!(reopened.auto_print_delay(), 5);
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSettings::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.auto_print_delay(), 3);
    }
}
