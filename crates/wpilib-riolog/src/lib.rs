//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "RioLog window bootstrap and IPC message model."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Bootstrap for the RioLog log window.
//!
//! The window-side script only wires host events to collaborators: the log
//! session (started on [`RIOLOG_PORT`] at load, disposed at unload), the shared
//! script handlers (resize and inbound messages) and the host window (developer
//! tools and reload shortcuts). Messages cross to the main process through a
//! [`Transport`].
#![warn(missing_docs)]

pub mod bootstrap;
pub mod transport;
pub mod types;
pub mod view;

/// UDP port the console session listens on.
pub const RIOLOG_PORT: u16 = 9999;
/// Key code toggling the developer tools (F12).
pub const KEY_TOGGLE_DEV_TOOLS: u32 = 123;
/// Key code reloading the window (F5).
pub const KEY_RELOAD: u32 = 116;

/// Shared result type for log-window operations.
pub type Result<T> = std::result::Result<T, RioLogError>;

/// Errors raised by the log-window bootstrap and its transports.
#[derive(Debug, thiserror::Error)]
pub enum RioLogError {
    /// The IPC channel rejected a message.
    #[error("transport {transport} failed: {message}")]
    Transport {
        /// Transport name.
        transport: &'static str,
        /// Failure description.
        message: String,
    },
    /// The log session failed to start or stop.
    #[error("log session error: {0}")]
    Session(String),
}

pub use bootstrap::{LogSession, LogWindowBootstrap, SharedScript, WindowEvent, WindowHost};
pub use transport::{InMemoryTransport, Transport};
pub use types::{Envelope, IpcPayload, MessageType, PrintMessage, ReceiveMessage, SendMessage};
pub use view::{in_memory_pair, MainProcessEndpoint, RioLogWindowView};
