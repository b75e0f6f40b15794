//! Partial notification records.
//!
//! Every caller talks to the engine in patches. Merge rules:
//! - a set field replaces the stored one (strings, content, durations)
//! - `background_task` merges field by field
//! - `on_change` merges per status

use std::time::Duration;

use super::ids::{NotificationKey, TaskId, Topic};
use super::notification::Content;
use super::overrides::OnChange;
use super::promise::TaskPromise;
use super::status::TaskStatus;

#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    pub key: Option<NotificationKey>,
    pub message: Option<Content>,
    pub description: Option<Content>,
    pub extra_description: Option<String>,
    pub open: Option<bool>,
    pub to: Option<String>,
    pub to_text: Option<String>,
    pub duration: Option<Duration>,
    pub background_task: Option<BackgroundTaskPatch>,
}

impl NotificationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<NotificationKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn message(mut self, message: impl Into<Content>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn description(mut self, description: impl Into<Content>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn extra_description(mut self, extra: impl Into<String>) -> Self {
        self.extra_description = Some(extra.into());
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn to_text(mut self, to_text: impl Into<String>) -> Self {
        self.to_text = Some(to_text.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn background_task(mut self, task: BackgroundTaskPatch) -> Self {
        self.background_task = Some(task);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
            && self.message.is_none()
            && self.description.is_none()
            && self.extra_description.is_none()
            && self.open.is_none()
            && self.to.is_none()
            && self.to_text.is_none()
            && self.duration.is_none()
            && self.background_task.is_none()
    }

    /// Deep merge: fields set in `other` win.
    pub fn merge(mut self, other: NotificationPatch) -> Self {
        if other.key.is_some() {
            self.key = other.key;
        }
        if other.message.is_some() {
            self.message = other.message;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.extra_description.is_some() {
            self.extra_description = other.extra_description;
        }
        if other.open.is_some() {
            self.open = other.open;
        }
        if other.to.is_some() {
            self.to = other.to;
        }
        if other.to_text.is_some() {
            self.to_text = other.to_text;
        }
        if other.duration.is_some() {
            self.duration = other.duration;
        }
        self.background_task = match (self.background_task, other.background_task) {
            (Some(mine), Some(theirs)) => Some(mine.merge(theirs)),
            (mine, theirs) => theirs.or(mine),
        };
        self
    }
}

impl From<&str> for NotificationPatch {
    fn from(description: &str) -> Self {
        Self::new().description(description)
    }
}

impl From<String> for NotificationPatch {
    fn from(description: String) -> Self {
        Self::new().description(description)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BackgroundTaskPatch {
    pub status: Option<TaskStatus>,
    pub percent: Option<f64>,
    pub task_id: Option<TaskId>,
    pub promise: Option<TaskPromise>,
    pub on_change: Option<OnChange>,
    pub topic: Option<Topic>,
}

impl BackgroundTaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a status-only patch.
    pub fn with_status(status: TaskStatus) -> Self {
        Self::new().status(status)
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn percent(mut self, percent: f64) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn task_id(mut self, task_id: impl Into<TaskId>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn promise(mut self, promise: TaskPromise) -> Self {
        self.promise = Some(promise);
        self
    }

    pub fn on_change(mut self, on_change: OnChange) -> Self {
        self.on_change = Some(on_change);
        self
    }

    pub fn topic(mut self, topic: impl Into<Topic>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn merge(mut self, other: BackgroundTaskPatch) -> Self {
        if other.status.is_some() {
            self.status = other.status;
        }
        if other.percent.is_some() {
            self.percent = other.percent;
        }
        if other.task_id.is_some() {
            self.task_id = other.task_id;
        }
        if other.promise.is_some() {
            self.promise = other.promise;
        }
        if other.topic.is_some() {
            self.topic = other.topic;
        }
        self.on_change = match (self.on_change, other.on_change) {
            (Some(mut mine), Some(theirs)) => {
                mine.merge(theirs);
                Some(mine)
            }
            (mine, theirs) => theirs.or(mine),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_fields_win_and_unset_fields_survive() {
        let a = NotificationPatch::new().key("k").message("first").to("/a");
        let b = NotificationPatch::new().message("second").open(true);

        let merged = a.merge(b);
        assert_eq!(merged.key, Some(NotificationKey::from("k")));
        assert_eq!(merged.message, Some(Content::text("second")));
        assert_eq!(merged.to.as_deref(), Some("/a"));
        assert_eq!(merged.open, Some(true));
    }

    #[test]
    fn background_task_merges_field_by_field() {
        let a = NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(TaskStatus::Pending)
                .percent(10.0)
                .task_id("t1"),
        );
        let b = NotificationPatch::new()
            .background_task(BackgroundTaskPatch::new().percent(20.0));

        let task = a.merge(b).background_task.unwrap();
        assert_eq!(task.status, Some(TaskStatus::Pending));
        assert_eq!(task.percent, Some(20.0));
        assert_eq!(task.task_id, Some(TaskId::from("t1")));
    }

    #[test]
    fn empty_patch() {
        assert!(NotificationPatch::new().is_empty());
        assert!(!NotificationPatch::from("text").is_empty());
    }
}
