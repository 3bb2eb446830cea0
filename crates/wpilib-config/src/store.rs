//! ---
//! wpi_section: "04-configuration"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Layered configuration service and settings tiers."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{to_pretty_json, ConfigError, Result};

/// Storage backend for one settings tier. Keys are fully qualified (`wpilib.teamNumber`).
pub trait SettingsStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Value>>;
    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: Value) -> Result<()>;
    /// Human-readable tier name for logging.
    fn name(&self) -> &'static str;
}

/// Location of the folder tier for a workspace.
pub fn folder_settings_path(workspace: &Path) -> PathBuf {
    workspace.join(".vscode").join("settings.json")
}

/// In-memory settings tier.
#[derive(Clone, Default)]
pub struct MemorySettings {
    values: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemorySettings {
    /// Create an empty tier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tier with one value.
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.lock().insert(key.into(), value.into());
        self
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Whether the tier holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.values.lock().insert(key.to_owned(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Settings tier stored as a flat JSON object of dotted keys.
///
/// Reads accept comments and trailing commas. Writes emit plain JSON, so
/// comments in the file do not survive an update.
#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    /// Bind a tier to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing this tier.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        let document: Value = crate::jsonc::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        match document {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let rendered = to_pretty_json(document)?;
        fs::write(&self.path, rendered).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for JsonSettingsFile {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut document = self.read_document()?;
        Ok(document.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut document = self.read_document()?;
        document.insert(key.to_owned(), value);
        self.write_document(&document)?;
        debug!(path = %self.path.display(), key, "settings file updated");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn memory_settings_set_and_get() {
        let store = MemorySettings::new().with("wpilib.online", true);
        assert_eq!(store.get("wpilib.online").unwrap(), Some(json!(true)));
        store.set("wpilib.teamNumber", json!(254)).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.get("wpilib.missing").unwrap().is_none());
    }

    #[test]
    fn json_file_missing_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsFile::new(dir.path().join("settings.json"));
        assert!(store.get("wpilib.teamNumber").unwrap().is_none());
    }

    #[test]
    fn json_file_tolerates_comments_and_trailing_commas() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            "{\n  // team setup\n  \"wpilib.teamNumber\": 971,\n  \"editor.tabSize\": 4,\n}\n",
        )
        .unwrap();
        let store = JsonSettingsFile::new(&path);
        assert_eq!(store.get("wpilib.teamNumber").unwrap(), Some(json!(971)));
    }

    #[test]
    fn json_file_set_creates_parent_and_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = folder_settings_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"editor.tabSize": 4}"#).unwrap();

        let store = JsonSettingsFile::new(&path);
        store.set("wpilib.autoStartRioLog", json!(true)).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["editor.tabSize"], json!(4));
        assert_eq!(written["wpilib.autoStartRioLog"], json!(true));

        let nested = JsonSettingsFile::new(dir.path().join("a/b/settings.json"));
        nested.set("wpilib.online", json!(false)).unwrap();
        assert!(nested.path().exists());
    }

    #[test]
    fn json_file_rejects_non_object_documents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = JsonSettingsFile::new(&path).get("wpilib.online").unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));

        fs::write(&path, "{ \"wpilib.online\": ").unwrap();
        let err = JsonSettingsFile::new(&path).get("wpilib.online").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
