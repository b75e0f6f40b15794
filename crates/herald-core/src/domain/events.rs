//! Events - server-sent task events.
//!
//! The transport decides how events travel; the engine only knows the five
//! logical kinds and the progress payload carried by each of them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskEventKind {
    /// The task made progress.
    Progress,
    /// The task finished successfully.
    Done,
    /// The task ran but failed.
    TaskFailed,
    /// The task never started, or the infrastructure behind the stream failed.
    StreamFailed,
    /// The task was cancelled on the server.
    Cancelled,
}

impl TaskEventKind {
    /// Map an SSE event name to its kind.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "progress-update" => Some(Self::Progress),
            "done" => Some(Self::Done),
            "task-failed" => Some(Self::TaskFailed),
            "stream-failed" => Some(Self::StreamFailed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Progress => "progress-update",
            Self::Done => "done",
            Self::TaskFailed => "task-failed",
            Self::StreamFailed => "stream-failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Progress)
    }
}

/// Payload carried by every task event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayload {
    #[serde(default)]
    pub current_progress: f64,
    #[serde(default)]
    pub total_progress: f64,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProgressPayload {
    pub fn new(current_progress: f64, total_progress: f64) -> Self {
        Self {
            current_progress,
            total_progress,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// `current / total * 100`, or `None` when the total is unknown.
    pub fn percent(&self) -> Option<f64> {
        if self.total_progress > 0.0 {
            Some(self.current_progress / self.total_progress * 100.0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvent {
    pub kind: TaskEventKind,
    pub payload: ProgressPayload,
}

impl TaskEvent {
    pub fn new(kind: TaskEventKind, payload: ProgressPayload) -> Self {
        Self { kind, payload }
    }

    pub fn progress(current: f64, total: f64) -> Self {
        Self::new(TaskEventKind::Progress, ProgressPayload::new(current, total))
    }

    pub fn done(current: f64, total: f64) -> Self {
        Self::new(TaskEventKind::Done, ProgressPayload::new(current, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("progress-update", Some(TaskEventKind::Progress))]
    #[case("done", Some(TaskEventKind::Done))]
    #[case("task-failed", Some(TaskEventKind::TaskFailed))]
    #[case("stream-failed", Some(TaskEventKind::StreamFailed))]
    #[case("cancelled", Some(TaskEventKind::Cancelled))]
    #[case("heartbeat", None)]
    fn wire_names(#[case] name: &str, #[case] kind: Option<TaskEventKind>) {
        assert_eq!(TaskEventKind::from_wire(name), kind);
        if let Some(kind) = kind {
            assert_eq!(kind.wire_name(), name);
        }
    }

    #[test]
    fn percent_handles_unknown_totals() {
        assert_eq!(ProgressPayload::new(25.0, 50.0).percent(), Some(50.0));
        assert_eq!(ProgressPayload::new(3.0, 0.0).percent(), None);
    }

    #[test]
    fn payload_decodes_from_server_json() {
        let payload: ProgressPayload =
            serde_json::from_str(r#"{"current_progress": 1, "total_progress": 4, "message": "copying"}"#)
                .unwrap();
        assert_eq!(payload.percent(), Some(25.0));
        assert_eq!(payload.message.as_deref(), Some("copying"));
    }
}
