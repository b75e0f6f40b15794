//! TracingPresenter - presenter that only logs.
//!
//! Default when no UI is attached (headless runs, the CLI).

use tracing::info;

use crate::domain::{Notification, NotificationKey};
use crate::ports::{DismissHandle, Presenter};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn show(&self, notification: &Notification, _dismiss: DismissHandle) {
        let task = notification.background_task.as_ref();
        info!(
            key = %notification.key,
            message = ?notification.message.as_ref().and_then(|m| m.as_text()),
            description = ?notification.description.as_ref().and_then(|d| d.as_text()),
            status = ?task.map(|t| t.status),
            percent = ?task.and_then(|t| t.percent),
            "notification"
        );
    }

    fn destroy(&self, key: &NotificationKey) {
        info!(key = %key, "notification closed");
    }

    fn destroy_all(&self) {
        info!("all notifications closed");
    }
}
