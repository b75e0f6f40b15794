//! Background task status.

use serde::{Deserialize, Serialize};

/// TaskStatus はバックグラウンドタスクの状態
///
/// State transitions:
/// - Pending -> Resolved
/// - Pending -> Rejected
///
/// Resolved and Rejected are terminal. A terminal task only leaves its state
/// when a new promise or task id starts a new task on the same notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Resolved,
    Rejected,
}

impl TaskStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Resolved | TaskStatus::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Pending, false)]
    #[case(TaskStatus::Resolved, true)]
    #[case(TaskStatus::Rejected, true)]
    fn terminal_states(#[case] status: TaskStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }
}
