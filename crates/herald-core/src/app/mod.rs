//! App - アプリケーション層
//!
//! ports を組み合わせて通知エンジンを実装します。
//!
//! # 主要コンポーネント
//! - **NotificationCenter**: 公開ファサード（upsert / destroy / clear / 参照）
//! - **NotificationCenterBuilder**: 構築とワイヤリング（Fail-fast）
//! - **StatusOverrideResolver**: status ごとの onChange 適用
//! - **PromiseTaskSubscriber** / **StreamTaskSubscriber**: background task の監視
//! - **SubscriptionDriver**: upsert のたびに subscriber を同期
//! - **DesktopNotificationBridge**: OS 通知への反映
//! - **Throttle** / **InFlight**: 補助ユーティリティ

pub mod builder;
pub mod config;
pub mod desktop_bridge;
pub mod driver;
pub mod facade;
pub mod promise_subscriber;
pub mod registry;
pub mod resolver;
pub mod stream_subscriber;
pub mod throttle;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, NotificationCenterBuilder};
pub use self::config::{CLOSING_DURATION, EngineConfig, PROGRESS_THROTTLE};
pub use self::desktop_bridge::DesktopNotificationBridge;
pub use self::driver::SubscriptionDriver;
pub use self::facade::{NotificationCenter, UpsertOptions, WeakCenter};
pub use self::promise_subscriber::PromiseTaskSubscriber;
pub use self::registry::{Claim, Finished, InFlight};
pub use self::resolver::StatusOverrideResolver;
pub use self::stream_subscriber::StreamTaskSubscriber;
pub use self::throttle::Throttle;
