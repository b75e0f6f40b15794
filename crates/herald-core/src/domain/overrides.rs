//! Per-status content overrides (`onChange`).
//!
//! An override is either literal data or a function of the settlement payload
//! and the notification that just changed status. A plain string is sugar for
//! a description-only patch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::notification::Notification;
use super::patch::NotificationPatch;
use super::payload::Payload;
use super::status::TaskStatus;

/// Signature of a computed override.
pub type OverrideFn = dyn Fn(Option<&Payload>, &Notification) -> NotificationPatch + Send + Sync;

#[derive(Clone)]
pub enum OverrideSpec {
    Literal(NotificationPatch),
    Computed(Arc<OverrideFn>),
}

impl OverrideSpec {
    /// Literal description.
    pub fn text(description: impl Into<String>) -> Self {
        Self::Literal(NotificationPatch::new().description(description.into()))
    }

    /// Computed override. The closure may return a patch or a string
    /// (interpreted as a description).
    pub fn computed<F, R>(f: F) -> Self
    where
        F: Fn(Option<&Payload>, &Notification) -> R + Send + Sync + 'static,
        R: Into<NotificationPatch>,
    {
        Self::Computed(Arc::new(
            move |payload: Option<&Payload>, notification: &Notification| -> NotificationPatch {
                f(payload, notification).into()
            },
        ))
    }
}

impl From<NotificationPatch> for OverrideSpec {
    fn from(patch: NotificationPatch) -> Self {
        Self::Literal(patch)
    }
}

impl From<&str> for OverrideSpec {
    fn from(description: &str) -> Self {
        Self::text(description)
    }
}

impl From<String> for OverrideSpec {
    fn from(description: String) -> Self {
        Self::text(description)
    }
}

impl fmt::Debug for OverrideSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(patch) => f.debug_tuple("Literal").field(patch).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// OnChange maps each status to the override applied when it is entered.
#[derive(Debug, Clone, Default)]
pub struct OnChange {
    by_status: HashMap<TaskStatus, OverrideSpec>,
}

impl OnChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, status: TaskStatus, over: impl Into<OverrideSpec>) -> Self {
        self.by_status.insert(status, over.into());
        self
    }

    pub fn get(&self, status: TaskStatus) -> Option<&OverrideSpec> {
        self.by_status.get(&status)
    }

    pub fn is_empty(&self) -> bool {
        self.by_status.is_empty()
    }

    /// Per-status merge: entries from `other` win.
    pub fn merge(&mut self, other: OnChange) {
        self.by_status.extend(other.by_status);
    }
}
