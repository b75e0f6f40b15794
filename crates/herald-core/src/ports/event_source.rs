//! TaskEventSource port - server-sent task events.
//!
//! # 実装
//! - **InMemoryEventSource**: 開発・テスト用
//! - **HttpEventSource**: SSE over HTTP

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::{TaskEvent, TaskId, TransportError};

/// Stream of events for one task. Ends when the server closes it.
pub type TaskEventStream = BoxStream<'static, TaskEvent>;

/// TaskEventSource opens an event stream correlated to a task id.
///
/// # 設計原則
/// - 1 task_id につき 1 stream（重複は subscriber 側の registry で防ぐ）
/// - transport が扱えない task_id は Err を返す
#[async_trait]
pub trait TaskEventSource: Send + Sync {
    async fn open(&self, task_id: &TaskId) -> Result<TaskEventStream, TransportError>;
}
