//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryNotificationStore**: 既定の store（容量付き、挿入順）
//! - **InMemoryEventSource**: 開発・テスト用の task event transport
//! - **HttpEventSource**: SSE over HTTP
//! - **BroadcastSideChannel**: side-channel signals
//! - **TracingPresenter** / **UnsupportedDesktop** / **LoggingNavigator**: UI なしの既定値
//! - **Recording***: テスト用

pub mod broadcast_channel;
pub mod desktop;
pub mod inmem_events;
pub mod memory_store;
pub mod recording;
pub mod sse;
pub mod tracing_presenter;

pub use self::broadcast_channel::BroadcastSideChannel;
pub use self::desktop::{LoggingNavigator, UnsupportedDesktop};
pub use self::inmem_events::InMemoryEventSource;
pub use self::memory_store::{InMemoryNotificationStore, MAX_NOTIFICATIONS};
pub use self::recording::{
    NavigatorCall, PresenterCall, RecordingDesktopSurface, RecordingNavigator, RecordingPresenter,
};
pub use self::sse::{HttpEventSource, SseDecoder, SseFrame};
pub use self::tracing_presenter::TracingPresenter;
