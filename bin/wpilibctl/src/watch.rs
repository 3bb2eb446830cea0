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
use tokio::runtime::Runtime;
use tokio::signal;
use wpilib_logging::{wpi_info, wpi_warn, LogContext};
use wpilib_prefs::Preferences;

use crate::GlobalOptions;

/// Follow preferences file events until Ctrl-C.
pub fn run(options: &GlobalOptions) -> Result<()> {
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let mut prefs = options.open_preferences(true)?;
    runtime.block_on(follow(&mut prefs, ctrl_c()));
    prefs.dispose();
    Ok(())
}

/// Apply events until `shutdown` resolves.
async fn follow(prefs: &mut Preferences, shutdown: impl std::future::Future<Output = ()>) {
    let workspace = prefs.workspace().display().to_string();
    let ctx = LogContext::new().with_workspace(&workspace);
    let mut project = prefs.project_flag().subscribe();
    wpi_info!(
        context = ctx,
        "watching preferences (project: {}, language: {})",
        prefs.is_wpilib_project(),
        prefs.current_language()
    );

    tokio::pin!(shutdown);
    loop {
        let outcome = tokio::select! {
            _ = &mut shutdown => break,
            outcome = prefs.next_event() => outcome,
        };
        match outcome {
            Ok(Some(event)) => wpi_info!(
                context = ctx,
                "preferences {} (project: {}, language: {})",
                event.label(),
                prefs.is_wpilib_project(),
                prefs.current_language()
            ),
            // No watcher left to wait on.
            Ok(None) => break,
            Err(err) => wpi_warn!(context = ctx, "failed to apply preferences change: {}", err),
        }
        if project.has_changed().unwrap_or(false) {
            let now = *project.borrow_and_update();
            println!("{} = {}", prefs.project_flag().name(), now);
        }
    }
    wpi_info!(context = ctx, "stopped watching preferences");
}

async fn ctrl_c() {
    if let Err(err) = signal::ctrl_c().await {
        wpi_warn!("failed to install Ctrl+C handler: {}", err);
    }
}
