//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "RioLog window bootstrap and IPC message model."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Event wiring for the log window.

use tracing::{debug, trace};
use wpilib_logging::{log_system_event, SystemEventOutcome};

use crate::transport::Transport;
use crate::types::{ReceiveMessage, SendMessage};
use crate::view::RioLogWindowView;
use crate::{Result, KEY_RELOAD, KEY_TOGGLE_DEV_TOOLS, RIOLOG_PORT};

/// Host window operations reachable from keyboard shortcuts.
pub trait WindowHost {
    /// Show or hide the developer tools.
    fn toggle_dev_tools(&self);
    /// Reload the window content.
    fn reload(&self);
}

/// Handlers shared by every log-window flavour.
pub trait SharedScript {
    /// Element the layout is measured against.
    type Body;
    /// Re-measure the layout after a resize.
    fn check_resize(&self, body: &Self::Body);
    /// Apply a message from the main process.
    fn handle_message(&self, message: SendMessage);
}

/// Console session feeding the window.
pub trait LogSession {
    /// Start listening on `port`.
    fn start(&mut self, port: u16) -> Result<()>;
    /// Stop listening and release resources.
    fn dispose(&mut self);
}

/// Host events the window reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window was resized.
    Resize,
    /// A key was pressed; carries the key code.
    KeyDown(u32),
    /// The window finished loading.
    Load,
    /// The window is being torn down.
    Unload,
}

/// Wires window events and IPC traffic to their collaborators.
pub struct LogWindowBootstrap<H, S, L, T>
where
    H: WindowHost,
    S: SharedScript,
    L: LogSession,
    T: Transport,
{
    host: H,
    script: S,
    session: L,
    view: RioLogWindowView<T>,
    body: S::Body,
    disposed: bool,
}

impl<H, S, L, T> LogWindowBootstrap<H, S, L, T>
where
    H: WindowHost,
    S: SharedScript,
    L: LogSession,
    T: Transport,
{
    /// Assemble the bootstrap. Nothing starts until [`WindowEvent::Load`].
    pub fn new(host: H, script: S, session: L, view: RioLogWindowView<T>, body: S::Body) -> Self {
        Self {
            host,
            script,
            session,
            view,
            body,
            disposed: false,
        }
    }

    /// React to one host event. Session start failures are returned as-is.
    pub fn handle_event(&mut self, event: WindowEvent) -> Result<()> {
        trace!(?event, "window event");
        match event {
            WindowEvent::Resize => self.check_resize(),
            WindowEvent::KeyDown(KEY_TOGGLE_DEV_TOOLS) => self.host.toggle_dev_tools(),
            WindowEvent::KeyDown(KEY_RELOAD) => self.host.reload(),
            WindowEvent::KeyDown(_) => {}
            WindowEvent::Load => {
                if let Err(err) = self.session.start(RIOLOG_PORT) {
                    log_system_event(
                        None,
                        "riolog.start",
                        &format!("log session failed to start on port {}: {}", RIOLOG_PORT, err),
                        SystemEventOutcome::Fault,
                    );
                    return Err(err);
                }
                self.disposed = false;
                log_system_event(
                    None,
                    "riolog.start",
                    &format!("log session listening on port {}", RIOLOG_PORT),
                    SystemEventOutcome::Success,
                );
            }
            WindowEvent::Unload => self.dispose(),
        }
        Ok(())
    }

    /// Re-measure the layout.
    pub fn check_resize(&self) {
        self.script.check_resize(&self.body);
    }

    /// Forward a window message to the main process.
    pub fn send_message(&self, message: ReceiveMessage) -> Result<()> {
        self.view.message_to_main(message)
    }

    /// Hand every queued main-process message to the shared handler.
    pub fn deliver_messages(&self) -> usize {
        let script = &self.script;
        self.view.pump(|message| script.handle_message(message))
    }

    /// Dispose the session once; later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.session.dispose();
        self.disposed = true;
        debug!("log session disposed");
    }

    /// Whether the session has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The log session.
    pub fn session(&self) -> &L {
        &self.session
    }
}
