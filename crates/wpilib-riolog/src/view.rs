//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "RioLog window bootstrap and IPC message model."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Both ends of the window/main-process channel.

use tracing::{trace, warn};

use crate::transport::{InMemoryTransport, Transport};
use crate::types::{Envelope, IpcPayload, ReceiveMessage, SendMessage};
use crate::Result;

/// Window-side end of the channel.
///
/// `to_main` carries [`ReceiveMessage`]s out; `from_main` carries
/// [`SendMessage`]s in.
#[derive(Clone)]
pub struct RioLogWindowView<T: Transport> {
    to_main: T,
    from_main: T,
}

impl<T: Transport> RioLogWindowView<T> {
    /// View over an outbound and an inbound transport.
    pub fn new(to_main: T, from_main: T) -> Self {
        Self { to_main, from_main }
    }

    /// Forward a window message to the main process.
    pub fn message_to_main(&self, message: ReceiveMessage) -> Result<()> {
        let envelope = Envelope::to_main(message);
        trace!(id = %envelope.id, kind = envelope.kind(), transport = self.to_main.name(), "window -> main");
        self.to_main.send(envelope)
    }

    /// Deliver every queued main-process message to `handler`, in order.
    /// Returns the number delivered.
    pub fn pump<F>(&self, mut handler: F) -> usize
    where
        F: FnMut(SendMessage),
    {
        let mut delivered = 0;
        while let Some(envelope) = self.from_main.recv() {
            match envelope.payload {
                IpcPayload::ToWindow(message) => {
                    handler(message);
                    delivered += 1;
                }
                IpcPayload::ToMain(_) => {
                    warn!(id = %envelope.id, "window received a message addressed to main; dropped")
                }
            }
        }
        delivered
    }
}

/// Main-process end of the channel.
#[derive(Clone)]
pub struct MainProcessEndpoint<T: Transport> {
    to_window: T,
    from_window: T,
}

impl<T: Transport> MainProcessEndpoint<T> {
    /// Endpoint over an outbound and an inbound transport.
    pub fn new(to_window: T, from_window: T) -> Self {
        Self {
            to_window,
            from_window,
        }
    }

    /// Send a message to the window.
    pub fn send_to_window(&self, message: SendMessage) -> Result<()> {
        let envelope = Envelope::to_window(message);
        trace!(id = %envelope.id, kind = envelope.kind(), transport = self.to_window.name(), "main -> window");
        self.to_window.send(envelope)
    }

    /// Next window message, skipping misaddressed envelopes.
    pub fn recv_from_window(&self) -> Option<ReceiveMessage> {
        while let Some(envelope) = self.from_window.recv() {
            match envelope.payload {
                IpcPayload::ToMain(message) => return Some(message),
                IpcPayload::ToWindow(_) => {
                    warn!(id = %envelope.id, "main received a message addressed to the window; dropped")
                }
            }
        }
        None
    }
}

/// Connected endpoints over in-memory queues.
pub fn in_memory_pair() -> (
    MainProcessEndpoint<InMemoryTransport>,
    RioLogWindowView<InMemoryTransport>,
) {
    let to_main = InMemoryTransport::new();
    let to_window = InMemoryTransport::new();
    (
        MainProcessEndpoint::new(to_window.clone(), to_main.clone()),
        RioLogWindowView::new(to_main, to_window),
    )
}
