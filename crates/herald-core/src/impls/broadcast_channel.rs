//! BroadcastSideChannel - side-channel signals over a tokio broadcast channel.

use tokio::sync::broadcast;

use crate::ports::{SideChannel, SideSignal};

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out side channel. Listeners that lag lose the oldest signals, which is
/// fine for invalidation-style topics.
pub struct BroadcastSideChannel {
    tx: broadcast::Sender<SideSignal>,
}

impl BroadcastSideChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SideSignal> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastSideChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SideChannel for BroadcastSideChannel {
    fn publish(&self, signal: SideSignal) {
        if self.tx.send(signal).is_err() {
            tracing::trace!("side signal dropped: no listeners");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NotificationKey, TaskId, Topic, topics};

    #[tokio::test]
    async fn listeners_receive_published_signals() {
        let channel = BroadcastSideChannel::new();
        let mut rx = channel.subscribe();
        let signal = SideSignal {
            topic: Topic::from(topics::IMAGE_RESCANNED),
            key: NotificationKey::from("rescan:1"),
            task_id: TaskId::from("t9"),
        };

        channel.publish(signal.clone());
        assert_eq!(rx.recv().await.unwrap(), signal);
    }

    #[test]
    fn publishing_without_listeners_is_fine() {
        let channel = BroadcastSideChannel::new();
        channel.publish(SideSignal {
            topic: Topic::from("t"),
            key: NotificationKey::from("k"),
            task_id: TaskId::from("x"),
        });
    }
}
