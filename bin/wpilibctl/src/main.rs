//! ---
//! wpi_section: "05-cli"
//! wpi_subsection: "binary"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Control CLI for WPILib workspace preferences."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use wpilib_config::LayeredConfiguration;
use wpilib_logging::{self as logging, LoggingConfig};
use wpilib_prefs::{Preferences, ProjectFlag};

mod commands;
mod prompt;
mod watch;

#[derive(Debug, Parser)]
#[command(author, version, about = "WPILib workspace control utility", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Workspace folder holding `.wpilib/`.
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// User-wide settings file (flat JSON of dotted keys).
    #[arg(
        long = "global-settings",
        value_name = "FILE",
        env = "WPILIB_GLOBAL_SETTINGS",
        global = true
    )]
    pub global_settings: Option<PathBuf>,

    /// Also write JSON logs to a daily rolling file in this directory.
    #[arg(long = "log-dir", value_name = "DIR", env = "WPILIB_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Open the workspace preferences, optionally with a file watcher attached.
    pub fn open_preferences(&self, watch: bool) -> Result<Preferences> {
        let config =
            LayeredConfiguration::for_workspace(&self.workspace, self.global_settings.clone());
        let flag = ProjectFlag::new();
        let opened = if watch {
            Preferences::open(&self.workspace, config, flag)
        } else {
            Preferences::new(&self.workspace, config, flag)
        };
        opened.with_context(|| {
            format!(
                "failed to open preferences for {}",
                self.workspace.display()
            )
        })
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand, about = "Inspect or edit the preferences file")]
    Prefs(commands::PrefsCommand),
    #[command(subcommand, name = "team-number", about = "Read or store the team number")]
    TeamNumber(commands::TeamNumberCommand),
    #[command(subcommand, about = "Toggle deploy and RioLog settings")]
    Settings(commands::SettingsCommand),
    /// Follow preferences file changes until Ctrl-C.
    Watch,
}

fn init_logging(options: &GlobalOptions) -> Result<()> {
    match &options.log_dir {
        Some(directory) => {
            let config = LoggingConfig {
                directory: directory.clone(),
                ..LoggingConfig::default()
            };
            logging::init_tracing("wpilibctl", &config)
                .with_context(|| format!("failed to initialise logging in {}", directory.display()))
        }
        None => {
            logging::init();
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global)?;
    match cli.command {
        Commands::Prefs(cmd) => commands::run_prefs(&cli.global, cmd)?,
        Commands::TeamNumber(cmd) => commands::run_team_number(&cli.global, cmd)?,
        Commands::Settings(cmd) => commands::run_settings(&cli.global, cmd)?,
        Commands::Watch => watch::run(&cli.global)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_subcommands_with_global_options() {
        let cli = Cli::try_parse_from([
            "wpilibctl",
            "team-number",
            "set",
            "254",
            "--global",
            "--workspace",
            "/robot",
        ])
        .unwrap();
        assert_eq!(cli.global.workspace, PathBuf::from("/robot"));
        assert!(matches!(
            cli.command,
            Commands::TeamNumber(commands::TeamNumberCommand::Set(ref args))
                if args.team == 254 && args.global
        ));
    }

    #[test]
    fn boolean_settings_take_explicit_values() {
        let cli = Cli::try_parse_from(["wpilibctl", "settings", "set-auto-start", "false"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings(commands::SettingsCommand::SetAutoStart(ref args))
                if !args.enabled && !args.global
        ));
        assert!(Cli::try_parse_from(["wpilibctl", "settings", "set-auto-save", "maybe"]).is_err());
    }
}
