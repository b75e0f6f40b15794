//! StreamTaskSubscriber - follows a server-side task through its event stream.
//!
//! One subscription per task id. Progress is throttled (leading edge plus a
//! trailing flush of the latest value). A terminal event marks the task id
//! finished, so other notifications carrying the same id never reopen its
//! stream, and then deregisters it. Updates for a notification that left the
//! feed are dropped.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, trace, warn};

use super::facade::{UpsertOptions, WeakCenter};
use super::registry::{Claim, Finished, InFlight};
use super::throttle::Throttle;
use crate::domain::{
    BackgroundTaskPatch, Notification, NotificationKey, NotificationPatch, TaskEvent,
    TaskEventKind, TaskId, TaskStatus, Topic,
};
use crate::ports::{SideChannel, SideSignal, TaskEventSource};

/// How many finished task ids are remembered.
const FINISHED_CAPACITY: usize = 256;

pub struct StreamTaskSubscriber {
    in_flight: InFlight<TaskId>,
    finished: Finished<TaskId>,
    source: Arc<dyn TaskEventSource>,
    side_channel: Arc<dyn SideChannel>,
    closing_duration: Duration,
    throttle_window: Duration,
    runtime: Handle,
}

impl StreamTaskSubscriber {
    pub fn new(
        source: Arc<dyn TaskEventSource>,
        side_channel: Arc<dyn SideChannel>,
        closing_duration: Duration,
        throttle_window: Duration,
        runtime: Handle,
    ) -> Self {
        Self {
            in_flight: InFlight::new(),
            finished: Finished::new(FINISHED_CAPACITY),
            source,
            side_channel,
            closing_duration,
            throttle_window,
            runtime,
        }
    }

    /// Open the task's event stream. Returns `false` when there is nothing
    /// to follow or the task id is already followed.
    pub fn subscribe(&self, center: &WeakCenter, notification: &Notification) -> bool {
        let Some(task) = notification.background_task.as_ref() else {
            return false;
        };
        let Some(task_id) = task.task_id.clone() else {
            return false;
        };
        if task.status != TaskStatus::Pending {
            return false;
        }
        let Some(claim) = self.in_flight.try_claim(&task_id) else {
            trace!(task_id = %task_id, "task stream already followed");
            return false;
        };
        // checked under the claim: a watch marks its task finished before releasing
        if self.finished.contains(&task_id) {
            trace!(key = %notification.key, task_id = %task_id, "task already finished");
            return false;
        }

        debug!(key = %notification.key, task_id = %task_id, "following task stream");

        let watch = StreamWatch {
            center: center.clone(),
            key: notification.key.clone(),
            task_id,
            topic: task.topic.clone(),
            finished: self.finished.clone(),
            side_channel: Arc::clone(&self.side_channel),
            closing_duration: self.closing_duration,
            throttle: Throttle::new(self.throttle_window),
        };
        self.runtime.spawn(watch.run(Arc::clone(&self.source), claim));
        true
    }

    pub fn is_following(&self, task_id: &TaskId) -> bool {
        self.in_flight.contains(task_id)
    }

    pub fn has_finished(&self, task_id: &TaskId) -> bool {
        self.finished.contains(task_id)
    }
}

struct StreamWatch {
    center: WeakCenter,
    key: NotificationKey,
    task_id: TaskId,
    topic: Option<Topic>,
    finished: Finished<TaskId>,
    side_channel: Arc<dyn SideChannel>,
    closing_duration: Duration,
    throttle: Throttle<Option<f64>>,
}

impl StreamWatch {
    async fn run(mut self, source: Arc<dyn TaskEventSource>, claim: Claim<TaskId>) {
        let mut events = match source.open(&self.task_id).await {
            Ok(events) => events,
            Err(err) => {
                // no retry: the notification stays pending
                warn!(
                    key = %self.key,
                    task_id = %self.task_id,
                    error = %err,
                    "could not open task event stream"
                );
                claim.retain();
                return;
            }
        };

        loop {
            let deadline = self.throttle.deadline();
            let event = tokio::select! {
                event = events.next() => event,
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(percent) = self.throttle.flush(Instant::now()) {
                        if !self.report_progress(percent) {
                            return;
                        }
                    }
                    continue;
                }
            };

            let Some(event) = event else {
                debug!(task_id = %self.task_id, "task stream ended without a terminal event");
                return;
            };

            if event.kind == TaskEventKind::Progress {
                let percent = event.payload.percent();
                if let Some(percent) = self.throttle.offer(Instant::now(), percent) {
                    if !self.report_progress(percent) {
                        return;
                    }
                }
                continue;
            }

            self.throttle.cancel();
            self.finished.mark(self.task_id.clone());
            claim.release();
            self.finish(event);
            return;
        }
    }

    /// Returns `false` once the center or the notification is gone.
    fn report_progress(&self, percent: Option<f64>) -> bool {
        let Some(center) = self.center.upgrade() else {
            return false;
        };
        let mut task = BackgroundTaskPatch::with_status(TaskStatus::Pending);
        if let Some(percent) = percent {
            task = task.percent(percent);
        }
        center.update_existing(
            NotificationPatch::new().key(self.key.clone()).background_task(task),
            UpsertOptions::progress(),
        )
    }

    fn finish(&self, event: TaskEvent) {
        let Some(center) = self.center.upgrade() else {
            return;
        };
        debug!(
            key = %self.key,
            task_id = %self.task_id,
            event = event.kind.wire_name(),
            "task stream finished"
        );
        let done = event.kind == TaskEventKind::Done;
        center.update_existing(self.terminal_patch(event), UpsertOptions::default());

        if done {
            self.publish_done();
        }
    }

    fn terminal_patch(&self, event: TaskEvent) -> NotificationPatch {
        let percent = event.payload.percent();
        let message = event.payload.message;
        let base = NotificationPatch::new().key(self.key.clone());

        let with_percent = |task: BackgroundTaskPatch| match percent {
            Some(percent) => task.percent(percent),
            None => task,
        };
        let with_message = |patch: NotificationPatch| match message {
            Some(message) => patch.extra_description(message),
            None => patch,
        };

        match event.kind {
            TaskEventKind::Done => base
                .background_task(BackgroundTaskPatch::with_status(TaskStatus::Resolved).percent(100.0))
                .duration(self.closing_duration),
            TaskEventKind::StreamFailed => {
                with_message(base.background_task(BackgroundTaskPatch::with_status(TaskStatus::Rejected)))
            }
            TaskEventKind::TaskFailed => with_message(
                base.background_task(with_percent(BackgroundTaskPatch::with_status(TaskStatus::Rejected))),
            ),
            TaskEventKind::Cancelled | TaskEventKind::Progress => {
                base.background_task(with_percent(BackgroundTaskPatch::with_status(TaskStatus::Rejected)))
            }
        }
    }

    fn publish_done(&self) {
        if let Some(topic) = &self.topic {
            debug!(topic = %topic, task_id = %self.task_id, "publishing side signal");
            self.side_channel.publish(SideSignal {
                topic: topic.clone(),
                key: self.key.clone(),
                task_id: self.task_id.clone(),
            });
        }
    }
}
