//! DesktopNotificationBridge - mirrors shown notifications to the OS.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Content, Notification};
use crate::ports::{ClickHandler, DesktopNotification, DesktopSurface, Navigator, Preferences};

pub struct DesktopNotificationBridge {
    surface: Arc<dyn DesktopSurface>,
    navigator: Arc<dyn Navigator>,
    preferences: Arc<dyn Preferences>,
    app_name: String,
}

impl DesktopNotificationBridge {
    pub fn new(
        surface: Arc<dyn DesktopSurface>,
        navigator: Arc<dyn Navigator>,
        preferences: Arc<dyn Preferences>,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            surface,
            navigator,
            preferences,
            app_name: app_name.into(),
        }
    }

    /// Post a desktop notification unless skipped or disabled by the user.
    /// Returns whether one was posted. Surface errors are swallowed.
    pub fn maybe_notify(&self, notification: &Notification, skip: bool) -> bool {
        if skip || !self.preferences.desktop_notifications_enabled() {
            return false;
        }

        let request = DesktopNotification {
            title: text_of(&notification.message).unwrap_or_else(|| self.app_name.clone()),
            body: text_of(&notification.description).unwrap_or_default(),
            tag: notification.key.to_string(),
        };

        let navigator = Arc::clone(&self.navigator);
        let to = notification.to.clone();
        let on_click = ClickHandler::new(move || {
            navigator.focus();
            if let Some(to) = &to {
                navigator.navigate(to);
            }
        });

        match self.surface.show(request, on_click) {
            Ok(()) => true,
            Err(err) => {
                debug!(key = %notification.key, error = %err, "desktop notification not shown");
                false
            }
        }
    }
}

fn text_of(content: &Option<Content>) -> Option<String> {
    content.as_ref().and_then(Content::as_text).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NotificationKey, NotificationPatch};
    use crate::impls::{NavigatorCall, RecordingDesktopSurface, RecordingNavigator};
    use crate::ports::StaticPreferences;
    use chrono::Utc;

    struct Fixture {
        surface: Arc<RecordingDesktopSurface>,
        navigator: Arc<RecordingNavigator>,
        preferences: Arc<StaticPreferences>,
        bridge: DesktopNotificationBridge,
    }

    fn fixture(surface: RecordingDesktopSurface) -> Fixture {
        let surface = Arc::new(surface);
        let navigator = Arc::new(RecordingNavigator::new());
        let preferences = Arc::new(StaticPreferences::new(true));
        let bridge = DesktopNotificationBridge::new(
            surface.clone(),
            navigator.clone(),
            preferences.clone(),
            "Dashboard",
        );
        Fixture {
            surface,
            navigator,
            preferences,
            bridge,
        }
    }

    fn notification(patch: NotificationPatch) -> Notification {
        let mut n = Notification::new(NotificationKey::from("clone:1"), Utc::now());
        n.apply(patch);
        n
    }

    #[test]
    fn posts_title_body_and_tag() {
        let f = fixture(RecordingDesktopSurface::new());
        let n = notification(NotificationPatch::new().message("Clone").description("Cloning disk"));

        assert!(f.bridge.maybe_notify(&n, false));
        let shown = f.surface.shown();
        assert_eq!(
            shown,
            vec![DesktopNotification {
                title: "Clone".into(),
                body: "Cloning disk".into(),
                tag: "clone:1".into(),
            }]
        );
    }

    #[test]
    fn falls_back_to_the_app_name() {
        let f = fixture(RecordingDesktopSurface::new());
        let n = notification(NotificationPatch::new().message(Content::Rich(serde_json::json!({"b": 1}))));

        f.bridge.maybe_notify(&n, false);
        assert_eq!(f.surface.shown()[0].title, "Dashboard");
        assert_eq!(f.surface.shown()[0].body, "");
    }

    #[test]
    fn skipped_or_disabled_posts_nothing() {
        let f = fixture(RecordingDesktopSurface::new());
        let n = notification(NotificationPatch::new().message("x"));

        assert!(!f.bridge.maybe_notify(&n, true));
        f.preferences.set_desktop_notifications(false);
        assert!(!f.bridge.maybe_notify(&n, false));
        assert!(f.surface.shown().is_empty());
    }

    #[test]
    fn click_focuses_and_navigates() {
        let f = fixture(RecordingDesktopSurface::new());
        let n = notification(NotificationPatch::new().message("x").to("/storage"));

        f.bridge.maybe_notify(&n, false);
        assert!(f.surface.click_last());
        assert_eq!(
            f.navigator.calls(),
            vec![NavigatorCall::Focus, NavigatorCall::Navigate("/storage".into())]
        );
    }

    #[test]
    fn surface_errors_are_swallowed() {
        let f = fixture(RecordingDesktopSurface::denied());
        let n = notification(NotificationPatch::new().message("x"));
        assert!(!f.bridge.maybe_notify(&n, false));
    }
}
