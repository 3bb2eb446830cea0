//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! On-disk preferences document.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use wpilib_config::to_pretty_json;

use crate::{PreferencesError, Result};

/// Language reported before a project selects one.
pub const DEFAULT_LANGUAGE: &str = "none";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_owned()
}

/// Contents of `wpilib_preferences.json`.
///
/// Fields other than `currentLanguage` are carried through unchanged on rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferencesJson {
    /// Language of the robot project (`java`, `cpp`, ...).
    #[serde(rename = "currentLanguage", default = "default_language")]
    pub current_language: String,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PreferencesJson {
    fn default() -> Self {
        Self {
            current_language: default_language(),
            extra: Map::new(),
        }
    }
}

impl PreferencesJson {
    /// Parse a document. Comments and trailing commas are accepted.
    pub fn parse(path: &Path, raw: &str) -> Result<Self> {
        wpilib_config::jsonc::from_str(raw).map_err(|err| PreferencesError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Read and parse the document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &raw)
    }

    /// Write the document with four-space indentation.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never see a truncated document.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = to_pretty_json(self)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = path.with_file_name(format!(".{}.tmp", file_name));
        fs::write(&staging, rendered).map_err(|source| PreferencesError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, path).map_err(|source| PreferencesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), language = %self.current_language, "preferences written");
        Ok(())
    }
}
