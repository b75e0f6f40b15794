//! InMemoryEventSource - 開発・テスト用の task event transport
//!
//! # 学習ポイント
//! - open 前に emit されたイベントもバッファされる（unbounded mpsc）
//! - mpsc Receiver を futures の Stream に変換（stream::unfold）

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::domain::{TaskEvent, TaskId, TransportError};
use crate::ports::{TaskEventSource, TaskEventStream};

struct Channel {
    tx: mpsc::UnboundedSender<TaskEvent>,
    rx: Option<mpsc::UnboundedReceiver<TaskEvent>>,
}

impl Channel {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Some(rx) }
    }
}

/// InMemoryEventSource は task_id ごとに 1 本のチャネルを持つ
///
/// # 使用例
/// ```ignore
/// let source = Arc::new(InMemoryEventSource::new());
/// source.emit(&TaskId::from("t1"), TaskEvent::done(100.0, 100.0));
/// ```
#[derive(Default)]
pub struct InMemoryEventSource {
    channels: Mutex<HashMap<TaskId, Channel>>,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event for `task_id`. Events sent before the stream is opened
    /// are delivered once it is.
    pub fn emit(&self, task_id: &TaskId, event: TaskEvent) {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let channel = channels.entry(task_id.clone()).or_insert_with(Channel::new);
        // the subscriber may have dropped its stream; nothing to deliver to then
        let _ = channel.tx.send(event);
    }

    /// Close the stream for `task_id` without a terminal event.
    pub fn close(&self, task_id: &TaskId) {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.remove(task_id);
    }

    /// Has a subscriber opened the stream for `task_id`?
    pub fn is_open(&self, task_id: &TaskId) -> bool {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.get(task_id).is_some_and(|c| c.rx.is_none())
    }
}

#[async_trait]
impl TaskEventSource for InMemoryEventSource {
    async fn open(&self, task_id: &TaskId) -> Result<TaskEventStream, TransportError> {
        let rx = {
            let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
            let channel = channels.entry(task_id.clone()).or_insert_with(Channel::new);
            channel
                .rx
                .take()
                .ok_or_else(|| TransportError::AlreadyOpen(task_id.clone()))?
        };

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskEventKind;

    #[tokio::test]
    async fn events_emitted_before_open_are_buffered() {
        let source = InMemoryEventSource::new();
        let task_id = TaskId::from("t1");
        source.emit(&task_id, TaskEvent::progress(1.0, 2.0));
        source.emit(&task_id, TaskEvent::done(2.0, 2.0));

        let mut stream = source.open(&task_id).await.unwrap();
        assert_eq!(stream.next().await.unwrap().kind, TaskEventKind::Progress);
        assert_eq!(stream.next().await.unwrap().kind, TaskEventKind::Done);
    }

    #[tokio::test]
    async fn second_open_is_rejected() {
        let source = InMemoryEventSource::new();
        let task_id = TaskId::from("t1");
        let _stream = source.open(&task_id).await.unwrap();
        assert!(source.is_open(&task_id));

        let err = source.open(&task_id).await.err().unwrap();
        assert!(matches!(err, TransportError::AlreadyOpen(id) if id == task_id));
    }

    #[tokio::test]
    async fn close_ends_the_stream() {
        let source = InMemoryEventSource::new();
        let task_id = TaskId::from("t1");
        let mut stream = source.open(&task_id).await.unwrap();

        source.close(&task_id);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn push_wakes_a_waiting_stream() {
        let source = std::sync::Arc::new(InMemoryEventSource::new());
        let task_id = TaskId::from("t1");
        let mut stream = source.open(&task_id).await.unwrap();

        let next = tokio::spawn(async move { stream.next().await });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        source.emit(&task_id, TaskEvent::done(1.0, 1.0));

        let event = next.await.unwrap().unwrap();
        assert_eq!(event.kind, TaskEventKind::Done);
    }
}
