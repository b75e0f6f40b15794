//! SideChannel port - cross-component signals.
//!
//! Some collaborators (the image list, for instance) need to know that a
//! streamed task finished without reading the notification feed. The stream
//! subscriber publishes a signal on the task's topic; listeners subscribe to
//! the channel implementation directly.

use crate::domain::{NotificationKey, TaskId, Topic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSignal {
    pub topic: Topic,
    pub key: NotificationKey,
    pub task_id: TaskId,
}

pub trait SideChannel: Send + Sync {
    fn publish(&self, signal: SideSignal);
}
