//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use wpilib_config::{keys, ConfigScope, LayeredConfiguration};
use wpilib_logging::{log_system_event, wpi_info, wpi_warn, LogContext, SystemEventOutcome};

use crate::document::PreferencesJson;
use crate::flag::ProjectFlag;
use crate::prompt::{request_team_number, Prompter, TeamNumberChoice, SAVE_TEAM_NUMBER_QUESTION};
use crate::watcher::{PreferencesFileEvent, PreferencesWatcher};
use crate::{PreferencesError, Result, NO_TEAM_NUMBER, PREFERENCES_DIR, PREFERENCES_FILE};

/// Preferences session for one workspace folder.
///
/// Holds the cached preferences document and the project flag. The cache
/// reflects the last successful read of the file, or the defaults when the
/// workspace is not a WPILib project.
#[derive(Debug)]
pub struct Preferences {
    workspace: PathBuf,
    label: String,
    config_folder: PathBuf,
    preferences_file: Option<PathBuf>,
    json: PreferencesJson,
    is_project: bool,
    config: LayeredConfiguration,
    flag: ProjectFlag,
    watcher: Option<PreferencesWatcher>,
    pending: VecDeque<PreferencesFileEvent>,
}

impl Preferences {
    /// Open the preferences of `workspace` and start watching the file.
    pub fn open(
        workspace: impl Into<PathBuf>,
        config: LayeredConfiguration,
        flag: ProjectFlag,
    ) -> Result<Self> {
        let mut preferences = Self::new(workspace, config, flag)?;
        preferences.start_watching()?;
        Ok(preferences)
    }

    /// Open the preferences of `workspace` without a watcher.
    ///
    /// File events can still be applied through [`Preferences::handle_file_event`].
    pub fn new(
        workspace: impl Into<PathBuf>,
        config: LayeredConfiguration,
        flag: ProjectFlag,
    ) -> Result<Self> {
        let workspace = workspace.into();
        // Watcher paths come back canonical; keep ours comparable.
        let workspace = fs::canonicalize(&workspace).unwrap_or(workspace);
        let config_folder = workspace.join(PREFERENCES_DIR);
        let config_file = config_folder.join(PREFERENCES_FILE);

        let mut preferences = Self {
            label: workspace.display().to_string(),
            workspace,
            config_folder,
            preferences_file: None,
            json: PreferencesJson::default(),
            is_project: false,
            config,
            flag,
            watcher: None,
            pending: VecDeque::new(),
        };

        if config_file.exists() {
            preferences.mark_project(Some(config_file));
            preferences.update_preferences()?;
        }
        wpi_info!(
            context = preferences.log_context(),
            "preferences opened (project: {}, language: {})",
            preferences.is_project,
            preferences.json.current_language
        );
        Ok(preferences)
    }

    fn log_context(&self) -> LogContext<'_> {
        LogContext::new().with_workspace(&self.label)
    }

    fn mark_project(&mut self, file: Option<PathBuf>) {
        self.is_project = file.is_some();
        self.flag.set(self.is_project);
        self.preferences_file = file;
    }

    /// Canonical location of the preferences file.
    pub fn preferences_path(&self) -> PathBuf {
        self.config_folder.join(PREFERENCES_FILE)
    }

    /// Workspace root.
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Layered settings backing the non-file preferences.
    pub fn configuration(&self) -> &LayeredConfiguration {
        &self.config
    }

    /// Flag toggled with the project state.
    pub fn project_flag(&self) -> &ProjectFlag {
        &self.flag
    }

    /// Attach a file watcher. No-op when one is already attached.
    pub fn start_watching(&mut self) -> Result<()> {
        if self.watcher.is_none() {
            let watcher = PreferencesWatcher::start(&self.workspace, &self.preferences_path())?;
            self.watcher = Some(watcher);
        }
        Ok(())
    }

    /// Whether a watcher is attached.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Apply one file event.
    ///
    /// A malformed file fails the reload; the error is returned and the cache
    /// keeps its previous content.
    pub fn handle_file_event(&mut self, event: PreferencesFileEvent) -> Result<()> {
        debug!(workspace = %self.label, event = event.label(), "preferences file event");
        match event {
            PreferencesFileEvent::Created(path) => self.mark_project(Some(path)),
            PreferencesFileEvent::Deleted => self.mark_project(None),
            PreferencesFileEvent::Changed => {}
        }
        self.update_preferences()
    }

    /// Queue an event for the next [`poll_events`](Self::poll_events) or
    /// [`next_event`](Self::next_event).
    pub fn enqueue_event(&mut self, event: PreferencesFileEvent) {
        self.pending.push_back(event);
    }

    /// Events waiting to be applied.
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// Apply every queued event in arrival order.
    ///
    /// Stops at the first failure and returns it. The failed event is
    /// consumed; the events behind it stay queued for the next call.
    pub fn poll_events(&mut self) -> Result<usize> {
        if let Some(watcher) = self.watcher.as_mut() {
            while let Some(event) = watcher.try_next() {
                self.pending.push_back(event);
            }
        }
        let mut applied = 0;
        while let Some(event) = self.pending.pop_front() {
            self.handle_file_event(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Wait for the next event and apply it.
    ///
    /// Queued events come first. Returns `Ok(None)` when nothing is queued and
    /// no watcher is attached. Cancel-safe, so it can sit in a `select!`.
    pub async fn next_event(&mut self) -> Result<Option<PreferencesFileEvent>> {
        let event = match self.pending.pop_front() {
            Some(event) => event,
            None => {
                let Some(watcher) = self.watcher.as_mut() else {
                    return Ok(None);
                };
                let Some(event) = watcher.next().await else {
                    return Ok(None);
                };
                event
            }
        };
        self.handle_file_event(event.clone())?;
        Ok(Some(event))
    }

    fn update_preferences(&mut self) -> Result<()> {
        let Some(path) = self.preferences_file.clone() else {
            self.json = PreferencesJson::default();
            return Ok(());
        };
        match PreferencesJson::load(&path) {
            Ok(json) => {
                self.json = json;
                log_system_event(
                    Some(&self.log_context()),
                    "prefs.reload",
                    &format!("preferences reloaded from {}", path.display()),
                    SystemEventOutcome::Success,
                );
                Ok(())
            }
            Err(err) => {
                log_system_event(
                    Some(&self.log_context()),
                    "prefs.reload",
                    &format!("failed to reload preferences: {}", err),
                    SystemEventOutcome::Fault,
                );
                Err(err)
            }
        }
    }

    /// Whether the workspace holds a preferences file.
    pub fn is_wpilib_project(&self) -> bool {
        self.is_project
    }

    /// Language recorded in the preferences file.
    pub fn current_language(&self) -> &str {
        &self.json.current_language
    }

    /// Cached preferences document.
    pub fn document(&self) -> &PreferencesJson {
        &self.json
    }

    /// Record the project language and persist the preferences file,
    /// creating `.wpilib/` on first write.
    ///
    /// The cache only changes once the file is written.
    pub fn set_current_language(&mut self, language: impl Into<String>) -> Result<()> {
        let mut json = self.json.clone();
        json.current_language = language.into();
        let path = match &self.preferences_file {
            Some(path) => path.clone(),
            None => {
                fs::create_dir_all(&self.config_folder).map_err(|source| PreferencesError::Io {
                    path: self.config_folder.clone(),
                    source,
                })?;
                self.preferences_path()
            }
        };
        json.save(&path)?;
        self.json = json;
        self.preferences_file = Some(path);
        Ok(())
    }

    /// Team number for deploys and the RioLog viewer.
    ///
    /// Prompts every time when `alwaysAskForTeamNumber` is set, and runs the
    /// first-time setup flow when no non-negative number is stored. A dismissed
    /// prompt yields `-1`.
    pub async fn team_number(&self, prompter: &dyn Prompter) -> i32 {
        if self.config.get::<bool>(keys::ALWAYS_ASK_FOR_TEAM_NUMBER) == Some(true) {
            return request_team_number(prompter).await;
        }
        match self.config.get::<i32>(keys::TEAM_NUMBER) {
            Some(team) if team >= 0 => team,
            _ => self.no_team_number_logic(prompter).await,
        }
    }

    async fn no_team_number_logic(&self, prompter: &dyn Prompter) -> i32 {
        let labels: Vec<&str> = TeamNumberChoice::ALL
            .iter()
            .map(TeamNumberChoice::label)
            .collect();
        let Some(answer) = prompter
            .information_message(SAVE_TEAM_NUMBER_QUESTION, &labels)
            .await
        else {
            return NO_TEAM_NUMBER;
        };
        let team = request_team_number(prompter).await;
        let scope = match TeamNumberChoice::from_label(&answer) {
            Some(TeamNumberChoice::SaveGlobally) => ConfigScope::Global,
            Some(TeamNumberChoice::SaveWorkspace) => ConfigScope::Folder,
            Some(TeamNumberChoice::DontSave) | None => return team,
        };
        if team != NO_TEAM_NUMBER {
            self.set_team_number(team, scope);
        }
        team
    }

    /// Store the team number. Failures are logged, never returned.
    pub fn set_team_number(&self, team: i32, scope: ConfigScope) {
        if let Err(err) = self.config.update(keys::TEAM_NUMBER, team, scope) {
            wpi_warn!(
                context = self.log_context().with_scope(scope.as_str()).with_key(keys::TEAM_NUMBER),
                "error setting team number: {}",
                err
            );
        }
    }

    /// Whether the RioLog viewer starts automatically. Defaults to `false`.
    pub fn auto_start_rio_log(&self) -> bool {
        self.config.get_or(keys::AUTO_START_RIO_LOG, false)
    }

    /// Store the RioLog auto-start flag.
    pub fn set_auto_start_rio_log(&self, auto_start: bool, scope: ConfigScope) -> Result<()> {
        Ok(self
            .config
            .update(keys::AUTO_START_RIO_LOG, auto_start, scope)?)
    }

    /// Whether dirty files are saved before deploy. Defaults to `false`.
    pub fn auto_save_on_deploy(&self) -> bool {
        self.config.get_or(keys::AUTO_SAVE_ON_DEPLOY, false)
    }

    /// Store the save-before-deploy flag.
    pub fn set_auto_save_on_deploy(&self, auto_save: bool, scope: ConfigScope) -> Result<()> {
        Ok(self
            .config
            .update(keys::AUTO_SAVE_ON_DEPLOY, auto_save, scope)?)
    }

    /// Whether online dependency repositories are used. Defaults to `false`.
    pub fn online(&self) -> bool {
        self.config.get_or(keys::ONLINE, false)
    }

    /// Release the file watcher and drop queued events. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.pending.clear();
        if self.watcher.take().is_some() {
            debug!(workspace = %self.label, "preferences watcher disposed");
        }
    }
}
