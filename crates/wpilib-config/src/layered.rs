//! ---
//! wpi_section: "04-configuration"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Layered configuration service and settings tiers."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::store::{folder_settings_path, JsonSettingsFile, MemorySettings, SettingsStore};
use crate::{ConfigScope, Result, SECTION};

/// Values held by each tier for one key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigInspection {
    /// Fully qualified key.
    pub key: String,
    /// Value in the global tier.
    pub global: Option<Value>,
    /// Value in the folder tier.
    pub folder: Option<Value>,
}

impl ConfigInspection {
    /// The value a read would resolve to.
    pub fn effective(&self) -> Option<&Value> {
        self.folder.as_ref().or(self.global.as_ref())
    }
}

/// Section-scoped view over a global and a folder settings tier.
#[derive(Clone)]
pub struct LayeredConfiguration {
    section: String,
    global: Arc<dyn SettingsStore>,
    folder: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for LayeredConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredConfiguration")
            .field("section", &self.section)
            .field("global", &self.global.name())
            .field("folder", &self.folder.name())
            .finish()
    }
}

impl LayeredConfiguration {
    /// Build a configuration over explicit tiers.
    pub fn new(
        section: impl Into<String>,
        global: Arc<dyn SettingsStore>,
        folder: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            section: section.into(),
            global,
            folder,
        }
    }

    /// Both tiers in memory, section `wpilib`.
    pub fn in_memory(global: MemorySettings, folder: MemorySettings) -> Self {
        Self::new(SECTION, Arc::new(global), Arc::new(folder))
    }

    /// File-backed tiers for a workspace. Without a global file the global tier
    /// lives in memory for the lifetime of the process.
    pub fn for_workspace(workspace: &Path, global_file: Option<PathBuf>) -> Self {
        let global: Arc<dyn SettingsStore> = match global_file {
            Some(path) => Arc::new(JsonSettingsFile::new(path)),
            None => Arc::new(MemorySettings::new()),
        };
        let folder = Arc::new(JsonSettingsFile::new(folder_settings_path(workspace)));
        Self::new(SECTION, global, folder)
    }

    /// Section prefix applied to keys.
    pub fn section(&self) -> &str {
        &self.section
    }

    fn qualify(&self, key: &str) -> String {
        format!("{}.{}", self.section, key)
    }

    fn tier(&self, scope: ConfigScope) -> &Arc<dyn SettingsStore> {
        match scope {
            ConfigScope::Global => &self.global,
            ConfigScope::Folder => &self.folder,
        }
    }

    fn read_tier(&self, scope: ConfigScope, qualified: &str) -> Option<Value> {
        match self.tier(scope).get(qualified) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = qualified, scope = scope.as_str(), error = %err, "settings tier unreadable; treating as unset");
                None
            }
        }
    }

    /// Resolve `key`, folder tier first. Absent, unreadable, or mistyped values read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let inspection = self.inspect(key);
        let value = inspection.effective()?.clone();
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                debug!(key = %inspection.key, error = %err, "setting has unexpected type; ignoring");
                None
            }
        }
    }

    /// Resolve `key`, falling back to `default`.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Per-tier values of `key`.
    pub fn inspect(&self, key: &str) -> ConfigInspection {
        let qualified = self.qualify(key);
        ConfigInspection {
            global: self.read_tier(ConfigScope::Global, &qualified),
            folder: self.read_tier(ConfigScope::Folder, &qualified),
            key: qualified,
        }
    }

    /// Write `value` for `key` into the tier selected by `scope`.
    pub fn update<T: Serialize>(&self, key: &str, value: T, scope: ConfigScope) -> Result<()> {
        let qualified = self.qualify(key);
        let value = serde_json::to_value(value)?;
        self.tier(scope).set(&qualified, value)?;
        debug!(key = %qualified, scope = scope.as_str(), "setting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use serde_json::json;

    #[test]
    fn folder_overrides_global() {
        let config = LayeredConfiguration::in_memory(
            MemorySettings::new().with("wpilib.teamNumber", 254),
            MemorySettings::new().with("wpilib.teamNumber", 1678),
        );
        assert_eq!(config.get::<i32>(keys::TEAM_NUMBER), Some(1678));
    }

    #[test]
    fn global_used_when_folder_unset() {
        let config = LayeredConfiguration::in_memory(
            MemorySettings::new().with("wpilib.online", true),
            MemorySettings::new(),
        );
        assert_eq!(config.get::<bool>(keys::ONLINE), Some(true));
        assert!(config.get::<bool>(keys::AUTO_SAVE_ON_DEPLOY).is_none());
        assert!(!config.get_or(keys::AUTO_SAVE_ON_DEPLOY, false));
    }

    #[test]
    fn mistyped_value_reads_as_unset() {
        let config = LayeredConfiguration::in_memory(
            MemorySettings::new(),
            MemorySettings::new().with("wpilib.teamNumber", "two-five-four"),
        );
        assert!(config.get::<i32>(keys::TEAM_NUMBER).is_none());
    }

    #[test]
    fn update_targets_requested_scope() {
        let global = MemorySettings::new();
        let folder = MemorySettings::new();
        let config = LayeredConfiguration::in_memory(global.clone(), folder.clone());

        config
            .update(keys::AUTO_START_RIO_LOG, true, ConfigScope::Global)
            .unwrap();
        assert_eq!(
            global.get("wpilib.autoStartRioLog").unwrap(),
            Some(json!(true))
        );
        assert!(folder.is_empty());

        config
            .update(keys::AUTO_START_RIO_LOG, false, ConfigScope::Folder)
            .unwrap();
        let inspection = config.inspect(keys::AUTO_START_RIO_LOG);
        assert_eq!(inspection.global, Some(json!(true)));
        assert_eq!(inspection.folder, Some(json!(false)));
        assert_eq!(inspection.effective(), Some(&json!(false)));
    }
}
