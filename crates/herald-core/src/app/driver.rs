//! SubscriptionDriver - keeps subscribers in step with the store.
//!
//! After every upsert the center hands the driver the pending notifications;
//! each one with a promise or a task id is offered to the matching
//! subscriber, whose registry drops the ones already being watched.

use super::facade::WeakCenter;
use super::promise_subscriber::PromiseTaskSubscriber;
use super::stream_subscriber::StreamTaskSubscriber;
use crate::domain::Notification;

pub struct SubscriptionDriver {
    promises: PromiseTaskSubscriber,
    streams: StreamTaskSubscriber,
}

impl SubscriptionDriver {
    pub fn new(promises: PromiseTaskSubscriber, streams: StreamTaskSubscriber) -> Self {
        Self { promises, streams }
    }

    /// Returns the number of subscriptions started.
    pub fn reconcile(&self, center: &WeakCenter, notifications: &[Notification]) -> usize {
        let mut started = 0;
        for notification in notifications.iter().filter(|n| n.is_pending()) {
            if self.promises.subscribe(center, notification) {
                started += 1;
            }
            if self.streams.subscribe(center, notification) {
                started += 1;
            }
        }
        started
    }

    pub fn promises(&self) -> &PromiseTaskSubscriber {
        &self.promises
    }

    pub fn streams(&self) -> &StreamTaskSubscriber {
        &self.streams
    }
}
