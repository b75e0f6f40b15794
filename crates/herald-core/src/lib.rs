//! herald-core
//!
//! Background-task notification engine: an in-memory notification feed whose
//! entries can track a local promise or a server-side task stream and update
//! themselves as the task progresses and settles.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, notification, patch, overrides, promise, events, errors）
//! - **ports**: 抽象化レイヤー（Presenter, DesktopSurface, TaskEventSource, SideChannel, NotificationStore, Clock, など）
//! - **app**: アプリケーションロジック（NotificationCenter, builder, subscribers, resolver, throttle）
//! - **impls**: 実装（in-memory store, SSE transport, broadcast side channel, テスト用 recording）
//! - **observability**: status ごとの件数

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use self::app::{
    BuildError, EngineConfig, NotificationCenter, NotificationCenterBuilder, UpsertOptions,
};
pub use self::domain::{
    BackgroundTaskPatch, Content, Notification, NotificationKey, NotificationPatch, OnChange,
    OverrideSpec, Payload, TaskId, TaskPromise, TaskStatus, Topic,
};
pub use self::observability::StatusCounts;
