//! NotificationCenterBuilder - 構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: runtime と event source が無ければ build() が失敗
//! - 未指定の port には UI なしの既定実装を使う

use std::sync::Arc;

use tokio::runtime::Handle;

use super::config::EngineConfig;
use super::desktop_bridge::DesktopNotificationBridge;
use super::driver::SubscriptionDriver;
use super::facade::NotificationCenter;
use super::promise_subscriber::PromiseTaskSubscriber;
use super::resolver::StatusOverrideResolver;
use super::stream_subscriber::StreamTaskSubscriber;
use crate::domain::ConfigError;
use crate::impls::{
    BroadcastSideChannel, HttpEventSource, InMemoryNotificationStore, LoggingNavigator,
    TracingPresenter, UnsupportedDesktop,
};
use crate::ports::{
    Clock, DesktopSurface, KeyGenerator, Navigator, NotificationStore, Preferences, Presenter,
    SideChannel, StaticPreferences, SystemClock, TaskEventSource, UlidKeyGenerator,
};

/// NotificationCenterBuilder は NotificationCenter を構築
///
/// # 使用例
/// ```ignore
/// let center = NotificationCenterBuilder::new(EngineConfig::default())
///     .presenter(Arc::new(MyToastStack::new()))
///     .event_source(Arc::new(InMemoryEventSource::new()))
///     .build()?;
/// ```
///
/// # 既定値
/// - store: InMemoryNotificationStore（容量は config.capacity）
/// - presenter: TracingPresenter / desktop: UnsupportedDesktop / navigator: LoggingNavigator
/// - preferences: StaticPreferences（config.desktop_notifications）
/// - side channel: BroadcastSideChannel
/// - event source: config.event_stream_url があれば HttpEventSource
#[derive(Default)]
pub struct NotificationCenterBuilder {
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
    keys: Option<Arc<dyn KeyGenerator>>,
    store: Option<Box<dyn NotificationStore>>,
    presenter: Option<Arc<dyn Presenter>>,
    desktop: Option<Arc<dyn DesktopSurface>>,
    navigator: Option<Arc<dyn Navigator>>,
    preferences: Option<Arc<dyn Preferences>>,
    event_source: Option<Arc<dyn TaskEventSource>>,
    side_channel: Option<Arc<dyn SideChannel>>,
    runtime: Option<Handle>,
}

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no tokio runtime: call build() inside a runtime or pass one with .runtime(handle)")]
    NoRuntime,

    #[error("no task event source: set one with .event_source(..) or configure event_stream_url")]
    MissingEventSource,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NotificationCenterBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn key_generator(mut self, keys: Arc<dyn KeyGenerator>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Replace the in-memory store. `config.capacity` is not applied to it.
    pub fn store(mut self, store: Box<dyn NotificationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn desktop(mut self, desktop: Arc<dyn DesktopSurface>) -> Self {
        self.desktop = Some(desktop);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn preferences(mut self, preferences: Arc<dyn Preferences>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn event_source(mut self, source: Arc<dyn TaskEventSource>) -> Self {
        self.event_source = Some(source);
        self
    }

    pub fn side_channel(mut self, side_channel: Arc<dyn SideChannel>) -> Self {
        self.side_channel = Some(side_channel);
        self
    }

    /// Runtime the subscribers are spawned on. Defaults to the current one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// # 検証
    /// - config が妥当か
    /// - runtime があるか（明示指定 or Handle::try_current）
    /// - event source があるか（明示指定 or event_stream_url）
    pub fn build(self) -> Result<NotificationCenter, BuildError> {
        let config = self.config;
        config.validate()?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| BuildError::NoRuntime)?,
        };

        let event_source: Arc<dyn TaskEventSource> = match (self.event_source, &config.event_stream_url) {
            (Some(source), _) => source,
            (None, Some(url)) => Arc::new(HttpEventSource::new(url.clone())),
            (None, None) => return Err(BuildError::MissingEventSource),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let keys = self
            .keys
            .unwrap_or_else(|| Arc::new(UlidKeyGenerator::new(Arc::clone(&clock))));
        let store = self
            .store
            .unwrap_or_else(|| Box::new(InMemoryNotificationStore::new(config.capacity, Arc::clone(&clock))));
        let preferences = self
            .preferences
            .unwrap_or_else(|| Arc::new(StaticPreferences::new(config.desktop_notifications)));

        let desktop = DesktopNotificationBridge::new(
            self.desktop.unwrap_or_else(|| Arc::new(UnsupportedDesktop)),
            self.navigator.unwrap_or_else(|| Arc::new(LoggingNavigator)),
            preferences,
            config.app_name.clone(),
        );

        let resolver = StatusOverrideResolver::new();
        let driver = SubscriptionDriver::new(
            PromiseTaskSubscriber::new(resolver, config.closing_duration(), runtime.clone()),
            StreamTaskSubscriber::new(
                event_source,
                self.side_channel
                    .unwrap_or_else(|| Arc::new(BroadcastSideChannel::new())),
                config.closing_duration(),
                config.progress_throttle(),
                runtime,
            ),
        );

        Ok(NotificationCenter::new(
            store,
            keys,
            self.presenter.unwrap_or_else(|| Arc::new(TracingPresenter)),
            desktop,
            driver,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryEventSource;

    #[tokio::test]
    async fn build_with_an_event_source() {
        let center = NotificationCenterBuilder::new(EngineConfig::default())
            .event_source(Arc::new(InMemoryEventSource::new()))
            .build();
        assert!(center.is_ok());
    }

    #[tokio::test]
    async fn event_stream_url_enables_the_http_transport() {
        let config = EngineConfig {
            event_stream_url: Some("http://127.0.0.1:9".into()),
            ..EngineConfig::default()
        };
        assert!(NotificationCenterBuilder::new(config).build().is_ok());
    }

    #[tokio::test]
    async fn build_without_an_event_source_fails() {
        let result = NotificationCenterBuilder::new(EngineConfig::default()).build();
        assert!(matches!(result, Err(BuildError::MissingEventSource)));
    }

    #[test]
    fn build_outside_a_runtime_fails() {
        let result = NotificationCenterBuilder::new(EngineConfig::default())
            .event_source(Arc::new(InMemoryEventSource::new()))
            .build();
        assert!(matches!(result, Err(BuildError::NoRuntime)));
    }

    #[test]
    fn an_explicit_runtime_is_enough() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let result = NotificationCenterBuilder::new(EngineConfig::default())
            .event_source(Arc::new(InMemoryEventSource::new()))
            .runtime(runtime.handle().clone())
            .build();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_config_fails_fast() {
        let config = EngineConfig {
            capacity: 0,
            ..EngineConfig::default()
        };
        let result = NotificationCenterBuilder::new(config)
            .event_source(Arc::new(InMemoryEventSource::new()))
            .build();
        assert!(matches!(result, Err(BuildError::Config(_))));
    }
}
