//! PromiseTaskSubscriber - watches one promise per notification key.
//!
//! When the promise settles the notification moves to `Resolved` (fulfilled)
//! or `Rejected` (rejected); the status override for the new status is
//! computed here, with the settlement payload, and merged into the same
//! upsert. A settlement for a notification that was cleared or evicted in
//! the meantime is dropped.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, trace};

use super::facade::{UpsertOptions, WeakCenter};
use super::registry::InFlight;
use super::resolver::StatusOverrideResolver;
use crate::domain::{
    BackgroundTaskPatch, Notification, NotificationKey, NotificationPatch, Payload, TaskStatus,
};

pub struct PromiseTaskSubscriber {
    in_flight: InFlight<NotificationKey>,
    resolver: StatusOverrideResolver,
    closing_duration: Duration,
    runtime: Handle,
}

impl PromiseTaskSubscriber {
    pub fn new(resolver: StatusOverrideResolver, closing_duration: Duration, runtime: Handle) -> Self {
        Self {
            in_flight: InFlight::new(),
            resolver,
            closing_duration,
            runtime,
        }
    }

    /// Start watching the notification's promise. Returns `false` when there
    /// is nothing to watch or the key is already watched.
    pub fn subscribe(&self, center: &WeakCenter, notification: &Notification) -> bool {
        let Some(task) = notification.background_task.as_ref() else {
            return false;
        };
        let Some(promise) = task.promise.clone() else {
            return false;
        };
        if task.status != TaskStatus::Pending {
            return false;
        }
        let Some(claim) = self.in_flight.try_claim(&notification.key) else {
            trace!(key = %notification.key, "promise already watched");
            return false;
        };

        debug!(key = %notification.key, promise = %promise.id(), "watching promise");

        let center = center.clone();
        let snapshot = notification.clone();
        let resolver = self.resolver;
        let closing_duration = self.closing_duration;
        self.runtime.spawn(async move {
            let (status, payload) = match promise.settle().await {
                Ok(value) => (TaskStatus::Resolved, value),
                Err(reason) => (TaskStatus::Rejected, reason),
            };
            let Some(center) = center.upgrade() else {
                return;
            };
            debug!(key = %snapshot.key, status = ?status, "promise settled");

            let Some(current) = center.get(&snapshot.key) else {
                debug!(key = %snapshot.key, "notification left the feed before settlement");
                return;
            };
            let patch = settlement_patch(&resolver, current, status, &payload, closing_duration);
            center.update_existing(patch, UpsertOptions::settlement());
            claim.release();
        });
        true
    }

    pub fn is_watching(&self, key: &NotificationKey) -> bool {
        self.in_flight.contains(key)
    }
}

/// `{status, duration} ⊕ resolve(notification as settled, payload)`.
pub(crate) fn settlement_patch(
    resolver: &StatusOverrideResolver,
    mut notification: Notification,
    status: TaskStatus,
    payload: &Payload,
    closing_duration: Duration,
) -> NotificationPatch {
    if let Some(task) = notification.background_task.as_mut() {
        task.status = status;
    }
    let overrides = resolver.resolve(&notification, Some(payload));

    NotificationPatch::new()
        .key(notification.key)
        .background_task(BackgroundTaskPatch::with_status(status))
        .duration(closing_duration)
        .merge(overrides)
}
