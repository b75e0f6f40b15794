//! Feed counts by task status.

use serde::{Deserialize, Serialize};

use crate::domain::{Notification, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Notifications without a background task.
    pub plain: usize,
    pub pending: usize,
    pub resolved: usize,
    pub rejected: usize,
    /// Notifications currently marked open.
    pub open: usize,
}

impl StatusCounts {
    pub fn from_notifications(notifications: &[Notification]) -> Self {
        let mut counts = Self::default();
        for notification in notifications {
            match notification.status() {
                None => counts.plain += 1,
                Some(TaskStatus::Pending) => counts.pending += 1,
                Some(TaskStatus::Resolved) => counts.resolved += 1,
                Some(TaskStatus::Rejected) => counts.rejected += 1,
            }
            if notification.open {
                counts.open += 1;
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.plain + self.pending + self.resolved + self.rejected
    }
}
