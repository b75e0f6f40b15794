//! StatusOverrideResolver - per-status content overrides.
//!
//! Looks up `on_change[status]` on the notification's background task and
//! turns it into a patch. With no override, a rejection whose payload carries
//! a message gets that message as its description.

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::domain::{Notification, NotificationPatch, OverrideSpec, Payload, TaskStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOverrideResolver;

impl StatusOverrideResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compute the override patch for the notification's current status.
    /// The result never carries a key.
    pub fn resolve(&self, notification: &Notification, payload: Option<&Payload>) -> NotificationPatch {
        let Some(task) = notification.background_task.as_ref() else {
            return NotificationPatch::new();
        };
        let status = task.status;

        let patch = match task.on_change.get(status) {
            None => fallback(status, payload),
            Some(OverrideSpec::Literal(patch)) => patch.clone(),
            Some(OverrideSpec::Computed(handler)) => {
                match panic::catch_unwind(AssertUnwindSafe(|| handler(payload, notification))) {
                    Ok(patch) => patch,
                    Err(_) => {
                        warn!(
                            key = %notification.key,
                            status = ?status,
                            "status override handler panicked, using the default"
                        );
                        fallback(status, payload)
                    }
                }
            }
        };

        NotificationPatch { key: None, ..patch }
    }
}

fn fallback(status: TaskStatus, payload: Option<&Payload>) -> NotificationPatch {
    match (status, payload.and_then(Payload::message)) {
        (TaskStatus::Rejected, Some(message)) => NotificationPatch::new().description(message.to_string()),
        _ => NotificationPatch::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BackgroundTaskPatch, Content, NotificationKey, OnChange};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    fn with_task(status: TaskStatus, on_change: OnChange) -> Notification {
        let mut n = Notification::new(NotificationKey::from("k"), Utc::now());
        n.apply(NotificationPatch::new().background_task(
            BackgroundTaskPatch::with_status(status).on_change(on_change),
        ));
        n
    }

    fn description(patch: &NotificationPatch) -> Option<&str> {
        patch.description.as_ref().and_then(Content::as_text)
    }

    #[test]
    fn no_background_task_gives_an_empty_patch() {
        let n = Notification::new(NotificationKey::from("plain"), Utc::now());
        assert!(StatusOverrideResolver.resolve(&n, None).is_empty());
    }

    #[rstest]
    #[case(TaskStatus::Rejected, Some(Payload::error("boom")), Some("boom"))]
    #[case(TaskStatus::Rejected, Some(Payload::new(json!(42))), None)]
    #[case(TaskStatus::Rejected, None, None)]
    #[case(TaskStatus::Resolved, Some(Payload::error("ignored")), None)]
    #[case(TaskStatus::Pending, None, None)]
    fn fallback_without_override(
        #[case] status: TaskStatus,
        #[case] payload: Option<Payload>,
        #[case] expected: Option<&str>,
    ) {
        let n = with_task(status, OnChange::new());
        let patch = StatusOverrideResolver.resolve(&n, payload.as_ref());
        assert_eq!(description(&patch), expected);
    }

    #[test]
    fn literal_string_is_a_description() {
        let n = with_task(TaskStatus::Resolved, OnChange::new().on(TaskStatus::Resolved, "Cloned"));
        let patch = StatusOverrideResolver.resolve(&n, None);
        assert_eq!(description(&patch), Some("Cloned"));
    }

    #[test]
    fn literal_override_wins_over_the_rejection_fallback() {
        let n = with_task(
            TaskStatus::Rejected,
            OnChange::new().on(TaskStatus::Rejected, NotificationPatch::new().message("Failed").open(true)),
        );
        let patch = StatusOverrideResolver.resolve(&n, Some(&Payload::error("boom")));
        assert_eq!(patch.message, Some(Content::text("Failed")));
        assert_eq!(patch.open, Some(true));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn computed_override_sees_payload_and_notification() {
        let on_change = OnChange::new().on(
            TaskStatus::Resolved,
            OverrideSpec::computed(|payload: Option<&Payload>, n: &Notification| {
                let name = payload
                    .and_then(|p| p.value().get("name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("?");
                format!("{} -> {name}", n.key)
            }),
        );
        let n = with_task(TaskStatus::Resolved, on_change);
        let payload = Payload::new(json!({ "name": "copy" }));

        let patch = StatusOverrideResolver.resolve(&n, Some(&payload));
        assert_eq!(description(&patch), Some("k -> copy"));
    }

    #[test]
    fn panicking_handler_falls_back() {
        let on_change = OnChange::new().on(
            TaskStatus::Rejected,
            OverrideSpec::computed(|_: Option<&Payload>, _: &Notification| -> NotificationPatch {
                panic!("handler bug")
            }),
        );
        let n = with_task(TaskStatus::Rejected, on_change);

        let patch = StatusOverrideResolver.resolve(&n, Some(&Payload::error("boom")));
        assert_eq!(description(&patch), Some("boom"));
    }

    #[test]
    fn key_is_stripped() {
        let n = with_task(
            TaskStatus::Resolved,
            OnChange::new().on(TaskStatus::Resolved, NotificationPatch::new().key("other")),
        );
        assert!(StatusOverrideResolver.resolve(&n, None).key.is_none());
    }
}
