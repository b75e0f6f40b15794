//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部の協調者（UI の通知スタック、OS 通知、SSE transport、
//! 設定画面など）へのインターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod desktop;
pub mod event_source;
pub mod key_generator;
pub mod notification_store;
pub mod presenter;
pub mod side_channel;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::desktop::{
    ClickHandler, DesktopNotification, DesktopSurface, Navigator, Preferences, StaticPreferences,
};
pub use self::event_source::{TaskEventSource, TaskEventStream};
pub use self::key_generator::{KeyGenerator, UlidKeyGenerator};
pub use self::notification_store::NotificationStore;
pub use self::presenter::{DismissHandle, Presenter};
pub use self::side_channel::{SideChannel, SideSignal};
