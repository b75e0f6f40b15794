//! Errors - エラー型
//!
//! Nothing here crosses the public facade: task failures are data (a
//! `Rejected` status). These types cover construction and the ports.

use thiserror::Error;

use super::ids::TaskId;

/// TransportError is returned when a task event stream cannot be opened.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("event stream for task_id={0} is already open")]
    AlreadyOpen(TaskId),

    #[error("event stream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("event stream for task_id={task_id} answered with status {status}")]
    Status { task_id: TaskId, status: u16 },
}

/// DesktopError is reported by desktop notification surfaces. The engine
/// swallows it.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("desktop notification permission denied")]
    PermissionDenied,

    #[error("desktop notifications are not supported here")]
    Unsupported,

    #[error("{0}")]
    Platform(String),
}

/// ConfigError is returned when engine configuration cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
