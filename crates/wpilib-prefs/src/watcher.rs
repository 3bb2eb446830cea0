//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! File watching for the preferences document.
//!
//! The workspace root is watched non-recursively. The `.wpilib` directory gets
//! its own non-recursive watch while it exists, so large workspaces never pay
//! for a recursive subscription.

use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, trace, warn};

use crate::Result;

/// Change to the preferences file, as seen by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesFileEvent {
    /// The file appeared at the given path.
    Created(PathBuf),
    /// The file content changed.
    Changed,
    /// The file was removed.
    Deleted,
}

impl PreferencesFileEvent {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            PreferencesFileEvent::Created(_) => "created",
            PreferencesFileEvent::Changed => "changed",
            PreferencesFileEvent::Deleted => "deleted",
        }
    }
}

/// Classified notify event, before the owner has acted on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// The preferences file itself changed.
    Preferences(PreferencesFileEvent),
    /// The `.wpilib` directory appeared or went away.
    ConfigDir {
        /// Whether the directory exists now.
        present: bool,
    },
}

/// Map a raw notify event onto a watch signal.
///
/// `target` is the preferences file, `config_dir` its parent. Renames are
/// resolved by checking the filesystem.
pub fn classify(event: &Event, target: &Path, config_dir: &Path) -> Option<WatchSignal> {
    if event.paths.iter().any(|path| path == target) {
        let mapped = match &event.kind {
            EventKind::Create(_) => PreferencesFileEvent::Created(target.to_path_buf()),
            EventKind::Remove(_) => PreferencesFileEvent::Deleted,
            EventKind::Modify(ModifyKind::Name(_)) if target.exists() => {
                PreferencesFileEvent::Created(target.to_path_buf())
            }
            EventKind::Modify(ModifyKind::Name(_)) => PreferencesFileEvent::Deleted,
            EventKind::Modify(_) | EventKind::Any => PreferencesFileEvent::Changed,
            _ => return None,
        };
        return Some(WatchSignal::Preferences(mapped));
    }

    if event.paths.iter().any(|path| path == config_dir) {
        let present = match &event.kind {
            EventKind::Create(_) => true,
            EventKind::Remove(_) => false,
            EventKind::Modify(ModifyKind::Name(_)) => config_dir.is_dir(),
            _ => return None,
        };
        return Some(WatchSignal::ConfigDir { present });
    }
    None
}

/// Watch over a workspace, forwarding preferences events over a channel.
///
/// The notify callback only classifies and forwards. Attaching the `.wpilib`
/// watch and every state change happen on the owner's side, in
/// [`PreferencesWatcher::try_next`] or [`PreferencesWatcher::next`]. Dropping
/// the watcher ends the subscription.
pub struct PreferencesWatcher {
    watcher: RecommendedWatcher,
    rx: UnboundedReceiver<WatchSignal>,
    root: PathBuf,
    config_dir: PathBuf,
    target: PathBuf,
    dir_watched: bool,
}

impl std::fmt::Debug for PreferencesWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesWatcher")
            .field("root", &self.root)
            .field("dir_watched", &self.dir_watched)
            .finish_non_exhaustive()
    }
}

impl PreferencesWatcher {
    /// Start watching `root` for changes to `target`.
    pub fn start(root: &Path, target: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let config_dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());

        let watched_target = target.to_path_buf();
        let watched_dir = config_dir.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                trace!(kind = ?event.kind, paths = ?event.paths, "raw watch event");
                if let Some(signal) = classify(&event, &watched_target, &watched_dir) {
                    // The receiver is gone once the session is disposed.
                    let _ = tx.send(signal);
                }
            }
            Err(err) => warn!(error = %err, "file watcher reported an error"),
        })?;
        watcher.watch(root, RecursiveMode::NonRecursive)?;

        let mut this = Self {
            watcher,
            rx,
            root: root.to_path_buf(),
            config_dir,
            target: target.to_path_buf(),
            dir_watched: false,
        };
        if this.config_dir.is_dir() {
            this.attach_config_dir();
        }
        debug!(root = %this.root.display(), dir_watched = this.dir_watched, "preferences watcher started");
        Ok(this)
    }

    /// Directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the `.wpilib` directory currently has its own watch.
    pub fn is_config_dir_watched(&self) -> bool {
        self.dir_watched
    }

    /// Next queued event, if any. Never blocks.
    pub fn try_next(&mut self) -> Option<PreferencesFileEvent> {
        while let Ok(signal) = self.rx.try_recv() {
            if let Some(event) = self.apply(signal) {
                return Some(event);
            }
        }
        None
    }

    /// Wait for the next event. Cancel-safe.
    pub async fn next(&mut self) -> Option<PreferencesFileEvent> {
        loop {
            let signal = self.rx.recv().await?;
            if let Some(event) = self.apply(signal) {
                return Some(event);
            }
        }
    }

    fn apply(&mut self, signal: WatchSignal) -> Option<PreferencesFileEvent> {
        match signal {
            WatchSignal::Preferences(event) => Some(event),
            WatchSignal::ConfigDir { present: true } => {
                self.attach_config_dir();
                // The file may have been written before the watch existed.
                self.target
                    .exists()
                    .then(|| PreferencesFileEvent::Created(self.target.clone()))
            }
            WatchSignal::ConfigDir { present: false } => {
                self.detach_config_dir();
                Some(PreferencesFileEvent::Deleted)
            }
        }
    }

    fn attach_config_dir(&mut self) {
        match self.watcher.watch(&self.config_dir, RecursiveMode::NonRecursive) {
            Ok(()) => {
                self.dir_watched = true;
                debug!(dir = %self.config_dir.display(), "watching preferences directory");
            }
            Err(err) => {
                warn!(dir = %self.config_dir.display(), error = %err, "failed to watch preferences directory")
            }
        }
    }

    fn detach_config_dir(&mut self) {
        if !self.dir_watched {
            return;
        }
        self.dir_watched = false;
        // The kernel drops the watch with the directory, so this usually fails.
        if let Err(err) = self.watcher.unwatch(&self.config_dir) {
            debug!(dir = %self.config_dir.display(), error = %err, "preferences directory watch already gone");
        }
    }
}
