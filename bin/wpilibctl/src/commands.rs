//! ---
//! wpi_section: "05-cli"
//! wpi_subsection: "binary"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Control CLI for WPILib workspace preferences."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Subcommand};
use serde::Serialize;
use tokio::runtime::Runtime;
use wpilib_config::{keys, ConfigScope};
use wpilib_logging::{log_system_event, LogContext, SystemEventOutcome};
use wpilib_prefs::Preferences;

use crate::prompt::StdinPrompter;
use crate::GlobalOptions;

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Print project state, language and settings.
    Show(ShowArgs),
    /// Record the project language in the preferences file.
    #[command(name = "set-language")]
    SetLanguage(SetLanguageArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Emit JSON instead of text.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SetLanguageArgs {
    /// Language identifier (`java`, `cpp`, ...).
    #[arg(value_name = "LANG")]
    pub language: String,
}

#[derive(Debug, Subcommand)]
pub enum TeamNumberCommand {
    /// Resolve the team number, prompting when needed.
    Get,
    /// Store a team number.
    Set(SetTeamArgs),
}

#[derive(Debug, Args)]
pub struct SetTeamArgs {
    /// Team number; negative clears it.
    #[arg(value_name = "N", allow_hyphen_values = true)]
    pub team: i32,
    /// Write to the global tier instead of the workspace folder.
    #[arg(long, action = ArgAction::SetTrue)]
    pub global: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Start the RioLog viewer automatically after deploy.
    #[command(name = "set-auto-start")]
    SetAutoStart(ToggleArgs),
    /// Save dirty files before deploy.
    #[command(name = "set-auto-save")]
    SetAutoSave(ToggleArgs),
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// `true` or `false`.
    #[arg(value_name = "BOOL", action = ArgAction::Set)]
    pub enabled: bool,
    /// Write to the global tier instead of the workspace folder.
    #[arg(long, action = ArgAction::SetTrue)]
    pub global: bool,
}

/// Snapshot printed by `prefs show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesReport {
    pub workspace: String,
    pub is_wpilib_project: bool,
    pub current_language: String,
    pub team_number: Option<i32>,
    pub always_ask_for_team_number: bool,
    pub auto_start_rio_log: bool,
    pub auto_save_on_deploy: bool,
    pub online: bool,
}

impl PreferencesReport {
    pub fn collect(prefs: &Preferences) -> Self {
        let config = prefs.configuration();
        Self {
            workspace: prefs.workspace().display().to_string(),
            is_wpilib_project: prefs.is_wpilib_project(),
            current_language: prefs.current_language().to_owned(),
            team_number: config
                .get::<i32>(keys::TEAM_NUMBER)
                .filter(|team| *team >= 0),
            always_ask_for_team_number: config.get_or(keys::ALWAYS_ASK_FOR_TEAM_NUMBER, false),
            auto_start_rio_log: prefs.auto_start_rio_log(),
            auto_save_on_deploy: prefs.auto_save_on_deploy(),
            online: prefs.online(),
        }
    }

    fn render_text(&self) -> String {
        let team = self
            .team_number
            .map(|team| team.to_string())
            .unwrap_or_else(|| "unset".to_owned());
        format!(
            "Workspace: {}\nWPILib project: {}\nLanguage: {}\nTeam number: {}\nAlways ask for team number: {}\nAuto-start RioLog: {}\nAuto-save on deploy: {}\nOnline: {}",
            self.workspace,
            self.is_wpilib_project,
            self.current_language,
            team,
            self.always_ask_for_team_number,
            self.auto_start_rio_log,
            self.auto_save_on_deploy,
            self.online
        )
    }
}

pub fn run_prefs(options: &GlobalOptions, command: PrefsCommand) -> Result<()> {
    match command {
        PrefsCommand::Show(args) => {
            let prefs = options.open_preferences(false)?;
            let report = PreferencesReport::collect(&prefs);
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("failed to render report")?
                );
            } else {
                println!("{}", report.render_text());
            }
        }
        PrefsCommand::SetLanguage(args) => {
            let mut prefs = options.open_preferences(false)?;
            prefs
                .set_current_language(args.language.as_str())
                .with_context(|| {
                    format!(
                        "failed to write {}",
                        prefs.preferences_path().display()
                    )
                })?;
            let workspace = prefs.workspace().display().to_string();
            log_system_event(
                Some(&LogContext::new().with_workspace(&workspace)),
                "prefs.set_language",
                &format!("language set to {}", args.language),
                SystemEventOutcome::Success,
            );
            println!("Language set to {}", args.language);
        }
    }
    Ok(())
}

pub fn run_team_number(options: &GlobalOptions, command: TeamNumberCommand) -> Result<()> {
    let prefs = options.open_preferences(false)?;
    match command {
        TeamNumberCommand::Get => {
            let runtime = Runtime::new().context("failed to start async runtime")?;
            let prompter = StdinPrompter::stdio();
            let team = runtime.block_on(prefs.team_number(&prompter));
            println!("{}", team);
        }
        TeamNumberCommand::Set(args) => {
            let scope = ConfigScope::from_global(args.global);
            prefs.set_team_number(args.team, scope);
            println!("Team number {} stored ({} scope)", args.team, scope.as_str());
        }
    }
    Ok(())
}

pub fn run_settings(options: &GlobalOptions, command: SettingsCommand) -> Result<()> {
    let prefs = options.open_preferences(false)?;
    match command {
        SettingsCommand::SetAutoStart(args) => {
            let scope = ConfigScope::from_global(args.global);
            prefs
                .set_auto_start_rio_log(args.enabled, scope)
                .context("failed to store autoStartRioLog")?;
            println!("autoStartRioLog = {} ({} scope)", args.enabled, scope.as_str());
        }
        SettingsCommand::SetAutoSave(args) => {
            let scope = ConfigScope::from_global(args.global);
            prefs
                .set_auto_save_on_deploy(args.enabled, scope)
                .context("failed to store autoSaveOnDeploy")?;
            println!("autoSaveOnDeploy = {} ({} scope)", args.enabled, scope.as_str());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn options(workspace: &Path, global: Option<&Path>) -> GlobalOptions {
        GlobalOptions {
            workspace: workspace.to_path_buf(),
            global_settings: global.map(Path::to_path_buf),
            log_dir: None,
        }
    }

    #[test]
    fn set_language_then_show_reports_project() {
        let dir = tempdir().unwrap();
        let opts = options(dir.path(), None);
        run_prefs(
            &opts,
            PrefsCommand::SetLanguage(SetLanguageArgs {
                language: "java".into(),
            }),
        )
        .unwrap();

        let prefs = opts.open_preferences(false).unwrap();
        let report = PreferencesReport::collect(&prefs);
        assert!(report.is_wpilib_project);
        assert_eq!(report.current_language, "java");
        assert_eq!(report.team_number, None);
        assert!(report.render_text().contains("Team number: unset"));
    }

    #[test]
    fn settings_land_in_the_selected_tier() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("user-settings.json");
        let opts = options(dir.path(), Some(&global));

        run_team_number(
            &opts,
            TeamNumberCommand::Set(SetTeamArgs {
                team: 254,
                global: true,
            }),
        )
        .unwrap();
        run_settings(
            &opts,
            SettingsCommand::SetAutoSave(ToggleArgs {
                enabled: true,
                global: false,
            }),
        )
        .unwrap();

        let global_raw = fs::read_to_string(&global).unwrap();
        assert!(global_raw.contains("\"wpilib.teamNumber\": 254"));
        let folder_raw =
            fs::read_to_string(dir.path().join(".vscode").join("settings.json")).unwrap();
        assert!(folder_raw.contains("\"wpilib.autoSaveOnDeploy\": true"));

        let report = PreferencesReport::collect(&opts.open_preferences(false).unwrap());
        assert_eq!(report.team_number, Some(254));
        assert!(report.auto_save_on_deploy);
        assert!(!report.auto_start_rio_log);
    }
}
