//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::PROJECT_CONTEXT_FLAG;

/// Observable boolean signalling whether the workspace is a WPILib project.
///
/// Clones share the same value. Observers get a [`watch::Receiver`] that
/// always holds the latest state.
#[derive(Debug, Clone)]
pub struct ProjectFlag {
    name: &'static str,
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ProjectFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectFlag {
    /// A flag named `isWPILibProject`, initially `false`.
    pub fn new() -> Self {
        Self::named(PROJECT_CONTEXT_FLAG)
    }

    /// A flag with a custom context name.
    pub fn named(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            name,
            tx: Arc::new(tx),
        }
    }

    /// Context name of the flag.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value.
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Publish a new value to every observer.
    pub fn set(&self, value: bool) {
        let previous = self.tx.send_replace(value);
        if previous != value {
            debug!(flag = self.name, value, "context flag changed");
        }
    }

    /// Observe future values.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
