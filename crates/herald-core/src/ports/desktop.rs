//! Desktop ports - OS notification surface, app navigation and preferences.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::DesktopError;

/// Native notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotification {
    pub title: String,
    pub body: String,
    /// The OS coalesces notifications with the same tag.
    pub tag: String,
}

/// Click callback registered with a native notification.
#[derive(Clone)]
pub struct ClickHandler(Arc<dyn Fn() + Send + Sync>);

impl ClickHandler {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn click(&self) {
        (self.0)()
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler")
    }
}

/// DesktopSurface は OS の通知領域
pub trait DesktopSurface: Send + Sync {
    fn show(&self, notification: DesktopNotification, on_click: ClickHandler) -> Result<(), DesktopError>;
}

/// Navigator brings the app forward and routes it.
pub trait Navigator: Send + Sync {
    fn focus(&self);
    fn navigate(&self, to: &str);
}

/// Preferences is read on every upsert; the engine does not own it.
pub trait Preferences: Send + Sync {
    fn desktop_notifications_enabled(&self) -> bool;
}

/// Preference backed by an atomic flag, flipped by the settings screen.
#[derive(Debug, Default)]
pub struct StaticPreferences {
    desktop_notifications: AtomicBool,
}

impl StaticPreferences {
    pub fn new(desktop_notifications: bool) -> Self {
        Self {
            desktop_notifications: AtomicBool::new(desktop_notifications),
        }
    }

    pub fn set_desktop_notifications(&self, enabled: bool) {
        self.desktop_notifications.store(enabled, Ordering::Relaxed);
    }
}

impl Preferences for StaticPreferences {
    fn desktop_notifications_enabled(&self) -> bool {
        self.desktop_notifications.load(Ordering::Relaxed)
    }
}
