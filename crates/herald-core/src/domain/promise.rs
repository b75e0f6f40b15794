//! TaskPromise - a locally held asynchronous computation.
//!
//! The promise is stored on the notification record, and notification records
//! are cloned freely (store snapshots, presenter calls), so the future is kept
//! behind `futures::future::Shared`. Every clone settles to the same value.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use ulid::Ulid;

use super::payload::Payload;

/// Result of a settled promise: fulfilled value or rejection reason.
pub type Settlement = Result<Payload, Payload>;

#[derive(Clone)]
pub struct TaskPromise {
    id: Ulid,
    inner: Shared<BoxFuture<'static, Settlement>>,
}

impl TaskPromise {
    /// Wrap any future whose output converts into payloads.
    ///
    /// # 使用例
    /// ```ignore
    /// let promise = TaskPromise::new(async { clone_repository().await.map_err(|e| e.to_string()) });
    /// ```
    pub fn new<F, T, E>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Into<Payload>,
        E: Into<Payload>,
    {
        let future = async move {
            match future.await {
                Ok(value) => Ok(value.into()),
                Err(reason) => Err(reason.into()),
            }
        };
        Self {
            id: Ulid::new(),
            inner: future.boxed().shared(),
        }
    }

    /// Promise that is already settled.
    pub fn settled(settlement: Settlement) -> Self {
        Self::new(futures::future::ready(settlement))
    }

    /// Identity of this promise (shared by all clones).
    pub fn id(&self) -> Ulid {
        self.id
    }

    /// Wait for settlement.
    pub async fn settle(self) -> Settlement {
        self.inner.await
    }
}

impl PartialEq for TaskPromise {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for TaskPromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskPromise")
            .field("id", &self.id)
            .field("settled", &self.inner.peek().is_some())
            .finish()
    }
}
