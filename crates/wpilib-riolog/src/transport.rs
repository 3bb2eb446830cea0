//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "RioLog window bootstrap and IPC message model."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::types::Envelope;
use crate::{Result, RioLogError};

/// One direction of the window/main-process channel.
pub trait Transport: Send + Sync {
    /// Send an envelope into the channel.
    fn send(&self, envelope: Envelope) -> Result<()>;
    /// Receive the next envelope, if available.
    fn recv(&self) -> Option<Envelope>;
    /// Human-readable transport name for logging.
    fn name(&self) -> &'static str;
}

/// In-process channel backed by a shared queue. Clones share the queue.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    queue: Arc<Mutex<VecDeque<Envelope>>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryTransport {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued envelopes.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Refuse further sends on every clone. Queued envelopes can still be received.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Transport for InMemoryTransport {
    fn send(&self, envelope: Envelope) -> Result<()> {
        if self.is_closed() {
            return Err(RioLogError::Transport {
                transport: self.name(),
                message: format!("channel closed; {} envelope {} not sent", envelope.kind(), envelope.id),
            });
        }
        self.queue.lock().push_back(envelope);
        Ok(())
    }

    fn recv(&self) -> Option<Envelope> {
        self.queue.lock().pop_front()
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}
