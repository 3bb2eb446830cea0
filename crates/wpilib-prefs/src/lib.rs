//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Per-workspace WPILib preferences.
//!
//! A [`Preferences`] session mirrors `<workspace>/.wpilib/wpilib_preferences.json`
//! and reads the remaining settings through a [`wpilib_config::LayeredConfiguration`].
//! File watcher notifications are turned into [`PreferencesFileEvent`]s and
//! applied by the owner of the session.
#![warn(missing_docs)]

use std::path::PathBuf;

use wpilib_config::ConfigError;

pub mod document;
pub mod flag;
pub mod preferences;
pub mod prompt;
pub mod watcher;

pub use document::{PreferencesJson, DEFAULT_LANGUAGE};
pub use flag::ProjectFlag;
pub use preferences::Preferences;
pub use prompt::{parse_team_number, request_team_number, Prompter, TeamNumberChoice};
pub use watcher::{PreferencesFileEvent, PreferencesWatcher, WatchSignal};

/// Directory under the workspace root holding the preferences file.
pub const PREFERENCES_DIR: &str = ".wpilib";
/// File name of the preferences document.
pub const PREFERENCES_FILE: &str = "wpilib_preferences.json";
/// Host-visible context flag toggled with the project state.
pub const PROJECT_CONTEXT_FLAG: &str = "isWPILibProject";
/// Team number returned when no number is available.
pub const NO_TEAM_NUMBER: i32 = -1;

/// Result alias used throughout the preferences crate.
pub type Result<T> = std::result::Result<T, PreferencesError>;

/// Errors raised by the preferences store.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    /// Reading or writing the preferences file failed.
    #[error("preferences io error at {path:?}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The preferences file is not structurally valid JSON.
    #[error("failed to parse preferences at {path:?}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// The file watcher could not be created or attached.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
    /// Settings tier failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_file() {
        let err = PreferencesError::Parse {
            path: PathBuf::from("/ws/.wpilib/wpilib_preferences.json"),
            message: "unexpected end of input".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("wpilib_preferences.json"));
        assert!(rendered.contains("unexpected end of input"));
    }
}
