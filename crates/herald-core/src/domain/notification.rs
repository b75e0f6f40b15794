//! Notification record: one feed entry plus its optional background task.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::ids::{NotificationKey, TaskId, Topic};
use super::overrides::OnChange;
use super::patch::{BackgroundTaskPatch, NotificationPatch};
use super::promise::TaskPromise;
use super::status::TaskStatus;

/// Display content. Rich content is owned by the rendering side and is never
/// inspected by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Rich(serde_json::Value),
}

impl Content {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Rich(_) => None,
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Notification record.
///
/// Design:
/// - Identity is `key` only.
/// - `created` is set once by the store and never touched by merges.
/// - All mutation goes through `apply`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub key: NotificationKey,
    pub message: Option<Content>,
    pub description: Option<Content>,
    pub extra_description: Option<String>,
    pub created: DateTime<Utc>,
    pub open: bool,
    pub to: Option<String>,
    pub to_text: Option<String>,
    /// Auto-dismiss. `Duration::ZERO` keeps the notification until closed.
    pub duration: Option<Duration>,
    pub background_task: Option<BackgroundTask>,
}

impl Notification {
    pub fn new(key: NotificationKey, created: DateTime<Utc>) -> Self {
        Self {
            key,
            message: None,
            description: None,
            extra_description: None,
            created,
            open: false,
            to: None,
            to_text: None,
            duration: None,
            background_task: None,
        }
    }

    /// Merge a patch into this record. `patch.key` is ignored.
    pub fn apply(&mut self, patch: NotificationPatch) {
        if let Some(message) = patch.message {
            self.message = Some(message);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(extra) = patch.extra_description {
            self.extra_description = Some(extra);
        }
        if let Some(open) = patch.open {
            self.open = open;
        }
        if let Some(to) = patch.to {
            self.to = Some(to);
        }
        if let Some(to_text) = patch.to_text {
            self.to_text = Some(to_text);
        }
        if let Some(duration) = patch.duration {
            self.duration = Some(duration);
        }
        if let Some(task_patch) = patch.background_task {
            match &mut self.background_task {
                Some(task) => task.apply(&self.key, task_patch),
                None => self.background_task = Some(BackgroundTask::from_patch(task_patch)),
            }
        }
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.background_task.as_ref().map(|t| t.status)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Some(TaskStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundTask {
    pub status: TaskStatus,
    pub percent: Option<f64>,
    pub task_id: Option<TaskId>,
    #[serde(skip)]
    pub promise: Option<TaskPromise>,
    #[serde(skip)]
    pub on_change: OnChange,
    pub topic: Option<Topic>,
}

impl BackgroundTask {
    pub fn from_patch(patch: BackgroundTaskPatch) -> Self {
        Self {
            status: patch.status.unwrap_or_default(),
            percent: patch.percent,
            task_id: patch.task_id,
            promise: patch.promise,
            on_change: patch.on_change.unwrap_or_default(),
            topic: patch.topic,
        }
    }

    /// Does the patch start a new task (a promise or task id we have not seen)?
    fn starts_new_task(&self, patch: &BackgroundTaskPatch) -> bool {
        let new_promise = patch
            .promise
            .as_ref()
            .is_some_and(|p| self.promise.as_ref() != Some(p));
        let new_task_id = patch
            .task_id
            .as_ref()
            .is_some_and(|id| self.task_id.as_ref() != Some(id));
        new_promise || new_task_id
    }

    fn apply(&mut self, key: &NotificationKey, patch: BackgroundTaskPatch) {
        if self.status.is_terminal() && self.starts_new_task(&patch) {
            self.status = patch.status.unwrap_or(TaskStatus::Pending);
            self.percent = patch.percent;
        } else if self.status.is_terminal() && patch.status.is_some_and(|s| s != self.status) {
            // terminal は終端: 同じタスクの status/percent は巻き戻さない
            debug!(
                key = %key,
                from = ?self.status,
                to = ?patch.status,
                "ignoring status change out of a terminal state"
            );
        } else {
            if let Some(status) = patch.status {
                self.status = status;
            }
            if let Some(percent) = patch.percent {
                self.percent = Some(percent);
            }
        }

        if let Some(task_id) = patch.task_id {
            self.task_id = Some(task_id);
        }
        if let Some(promise) = patch.promise {
            self.promise = Some(promise);
        }
        if let Some(topic) = patch.topic {
            self.topic = Some(topic);
        }
        if let Some(on_change) = patch.on_change {
            self.on_change.merge(on_change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Payload, TaskPromise};

    fn record() -> Notification {
        Notification::new(NotificationKey::from("k"), Utc::now())
    }

    fn pending(percent: f64) -> NotificationPatch {
        NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Pending).percent(percent),
        )
    }

    #[test]
    fn status_survives_a_percent_only_patch() {
        let mut n = record();
        n.apply(pending(10.0));
        n.apply(NotificationPatch::new().background_task(BackgroundTaskPatch::new().percent(20.0)));

        let task = n.background_task.as_ref().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.percent, Some(20.0));
    }

    #[test]
    fn terminal_status_is_not_reverted() {
        let mut n = record();
        n.apply(pending(10.0));
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Resolved).percent(100.0),
        ));
        n.apply(pending(40.0).description("late progress"));

        let task = n.background_task.as_ref().unwrap();
        assert_eq!(task.status, TaskStatus::Resolved);
        assert_eq!(task.percent, Some(100.0));
        // content still merges
        assert_eq!(n.description, Some(Content::text("late progress")));
    }

    #[test]
    fn resolved_cannot_flip_to_rejected() {
        let mut n = record();
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Resolved),
        ));
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Rejected),
        ));
        assert_eq!(n.status(), Some(TaskStatus::Resolved));
    }

    #[test]
    fn a_new_promise_restarts_a_terminal_task() {
        let first = TaskPromise::settled(Ok(Payload::default()));
        let second = TaskPromise::settled(Ok(Payload::default()));

        let mut n = record();
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Pending).promise(first.clone()),
        ));
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Resolved),
        ));

        // same promise again: still resolved
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Pending).promise(first),
        ));
        assert_eq!(n.status(), Some(TaskStatus::Resolved));

        n.apply(NotificationPatch::new().background_task(BackgroundTaskPatch::new().promise(second.clone())));
        assert!(n.is_pending());
        assert_eq!(n.background_task.unwrap().promise, Some(second));
    }

    #[test]
    fn a_new_task_id_restarts_a_terminal_task() {
        let mut n = record();
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Rejected).task_id("t1"),
        ));
        n.apply(NotificationPatch::new().background_task(BackgroundTaskPatch::new().task_id("t2")));

        let task = n.background_task.unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.task_id, Some(TaskId::from("t2")));
    }

    #[test]
    fn serializes_without_promise_and_handlers() {
        let mut n = record();
        n.apply(
            NotificationPatch::new()
                .message("Cloning")
                .background_task(BackgroundTaskPatch::with_status(TaskStatus::Pending).task_id("t1")),
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["message"], "Cloning");
        assert_eq!(json["backgroundTask"]["status"], "pending");
        assert_eq!(json["backgroundTask"]["taskId"], "t1");
        assert!(json["backgroundTask"].get("promise").is_none());
    }
}
