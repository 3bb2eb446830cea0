//! ---
//! wpi_section: "04-configuration"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Layered configuration service and settings tiers."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Layered configuration for WPILib workspaces.
//!
//! Settings live in two tiers: a global tier shared by every workspace and a
//! folder tier stored with the workspace. Reads resolve folder first, then
//! global. Writes target exactly one tier, chosen by [`ConfigScope`].
#![warn(missing_docs)]

use std::path::PathBuf;

pub mod jsonc;
pub mod layered;
pub mod store;

pub use layered::{ConfigInspection, LayeredConfiguration};
pub use store::{folder_settings_path, JsonSettingsFile, MemorySettings, SettingsStore};

/// Section prefix applied to every WPILib setting key.
pub const SECTION: &str = "wpilib";

/// Well-known setting keys, relative to [`SECTION`].
pub mod keys {
    /// Integer team number; negative means unset.
    pub const TEAM_NUMBER: &str = "teamNumber";
    /// Always prompt for the team number, ignoring any stored value.
    pub const ALWAYS_ASK_FOR_TEAM_NUMBER: &str = "alwaysAskForTeamNumber";
    /// Start the RioLog viewer automatically after deploy.
    pub const AUTO_START_RIO_LOG: &str = "autoStartRioLog";
    /// Save dirty editors before deploying.
    pub const AUTO_SAVE_ON_DEPLOY: &str = "autoSaveOnDeploy";
    /// Build against online dependency repositories.
    pub const ONLINE: &str = "online";
}

/// Result alias used throughout the configuration crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while reading or writing a settings tier.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file could not be read or written.
    #[error("settings io error at {path:?}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid JSON (comments and trailing commas are allowed).
    #[error("failed to parse settings at {path:?}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The settings document parsed but is not a JSON object.
    #[error("settings document at {path:?} is not a JSON object")]
    NotAnObject {
        /// Offending file.
        path: PathBuf,
    },
    /// Wrapper for JSON serialization failures.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which tier a setting is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigScope {
    /// Shared by every workspace of the user.
    Global,
    /// Stored with one workspace folder; overrides [`ConfigScope::Global`].
    Folder,
}

impl ConfigScope {
    /// Map the `global` flag used by setters onto a scope.
    pub fn from_global(global: bool) -> Self {
        if global {
            ConfigScope::Global
        } else {
            ConfigScope::Folder
        }
    }

    /// Lower-case label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigScope::Global => "global",
            ConfigScope::Folder => "folder",
        }
    }
}

/// Serialize a value as JSON indented with four spaces.
pub fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_global_flag() {
        assert_eq!(ConfigScope::from_global(true), ConfigScope::Global);
        assert_eq!(ConfigScope::from_global(false), ConfigScope::Folder);
        assert_eq!(ConfigScope::Folder.as_str(), "folder");
    }

    #[test]
    fn pretty_json_uses_four_space_indent() {
        let rendered = to_pretty_json(&serde_json::json!({"currentLanguage": "java"})).unwrap();
        assert_eq!(rendered, "{\n    \"currentLanguage\": \"java\"\n}");
    }
}
