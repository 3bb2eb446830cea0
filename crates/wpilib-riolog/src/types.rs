//! ---
//! wpi_section: "02-riolog-ipc"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "RioLog window bootstrap and IPC message model."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Plain output.
    Print,
    /// Warning reported by the robot program.
    Warning,
    /// Error reported by the robot program.
    Error,
}

/// One console line received from the robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintMessage {
    /// Severity.
    pub message_type: MessageType,
    /// Robot timestamp in seconds.
    pub seconds: f64,
    /// Sequence number assigned by the robot.
    pub sequence: u16,
    /// Text of the line, or the error details.
    pub line: String,
    /// Source location for warnings and errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Call stack for warnings and errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_stack: Option<String>,
}

impl PrintMessage {
    /// Plain output line.
    pub fn print(seconds: f64, sequence: u16, line: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Print,
            seconds,
            sequence,
            line: line.into(),
            location: None,
            call_stack: None,
        }
    }
}

/// Messages the window sends to the main process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum ReceiveMessage {
    /// Clear buffered lines.
    Discard,
    /// Pause or resume the display.
    Pause(bool),
    /// Save the given lines to a file chosen by the main process.
    Save(Vec<String>),
    /// Stop (`true`) or restart (`false`) the console connection.
    Reconnect(bool),
    /// Switch to another team number.
    ChangeNumber(i32),
}

/// Messages the main process sends to the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum SendMessage {
    /// Several lines at once.
    Batch(Vec<PrintMessage>),
    /// Console connection went up (`true`) or down.
    ConnectionChanged(bool),
    /// Number of lines held back while paused.
    PauseUpdate(usize),
    /// A single new line.
    New(PrintMessage),
}

/// Either direction of window traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum IpcPayload {
    /// Window to main process.
    ToMain(ReceiveMessage),
    /// Main process to window.
    ToWindow(SendMessage),
}

/// Envelope carried over a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique identifier for tracing.
    pub id: Uuid,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Carried message.
    pub payload: IpcPayload,
}

impl Envelope {
    /// Wrap a payload.
    pub fn new(payload: IpcPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Envelope for a window-to-main message.
    pub fn to_main(message: ReceiveMessage) -> Self {
        Self::new(IpcPayload::ToMain(message))
    }

    /// Envelope for a main-to-window message.
    pub fn to_window(message: SendMessage) -> Self {
        Self::new(IpcPayload::ToWindow(message))
    }

    /// Payload kind, for logs.
    pub fn kind(&self) -> &'static str {
        match &self.payload {
            IpcPayload::ToMain(_) => "to_main",
            IpcPayload::ToWindow(_) => "to_window",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn receive_message_uses_tagged_layout() {
        let value = serde_json::to_value(ReceiveMessage::ChangeNumber(254)).unwrap();
        assert_eq!(value, json!({"type": "change_number", "message": 254}));

        let discard = serde_json::to_value(ReceiveMessage::Discard).unwrap();
        assert_eq!(discard, json!({"type": "discard"}));
    }

    #[test]
    fn envelope_decodes_recorded_traffic() {
        let raw = json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "timestamp": "2024-01-01T00:00:00Z",
            "payload": {
                "kind": "to_window",
                "data": {
                    "type": "new",
                    "message": {"message_type": "print", "seconds": 1.5, "sequence": 3, "line": "Robot program starting"}
                }
            }
        });
        let envelope: Envelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.kind(), "to_window");
        assert_eq!(
            envelope.payload,
            IpcPayload::ToWindow(SendMessage::New(PrintMessage::print(
                1.5,
                3,
                "Robot program starting"
            )))
        );
    }
}
