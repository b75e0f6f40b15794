//! Recording test doubles for the presentation-side ports.

use std::sync::Mutex;

use crate::domain::{DesktopError, Notification, NotificationKey};
use crate::ports::{ClickHandler, DesktopNotification, DesktopSurface, DismissHandle, Navigator, Presenter};

#[derive(Debug, Clone)]
pub enum PresenterCall {
    Show(Notification),
    Destroy(NotificationKey),
    DestroyAll,
}

/// Presenter that records every call and keeps the latest dismiss handle per
/// key, so tests can play the user closing a notification.
#[derive(Default)]
pub struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
    handles: Mutex<Vec<(NotificationKey, DismissHandle)>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Every notification shown for `key`, in order.
    pub fn shown(&self, key: &NotificationKey) -> Vec<Notification> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresenterCall::Show(n) if &n.key == key => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self, key: &NotificationKey) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PresenterCall::Destroy(k) if k == key))
            .count()
    }

    /// Simulate the user closing the notification shown for `key`.
    pub fn user_dismiss(&self, key: &NotificationKey) -> bool {
        let handle = {
            let handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
            handles.iter().rev().find(|(k, _)| k == key).map(|(_, h)| h.clone())
        };
        match handle {
            Some(handle) => {
                handle.dismiss();
                true
            }
            None => false,
        }
    }
}

impl Presenter for RecordingPresenter {
    fn show(&self, notification: &Notification, dismiss: DismissHandle) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PresenterCall::Show(notification.clone()));
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((notification.key.clone(), dismiss));
    }

    fn destroy(&self, key: &NotificationKey) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PresenterCall::Destroy(key.clone()));
    }

    fn destroy_all(&self) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PresenterCall::DestroyAll);
    }
}

/// Desktop surface that records requests (or fails, if told to).
#[derive(Default)]
pub struct RecordingDesktopSurface {
    shown: Mutex<Vec<(DesktopNotification, ClickHandler)>>,
    fail: bool,
}

impl RecordingDesktopSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose permission was denied.
    pub fn denied() -> Self {
        Self {
            shown: Mutex::default(),
            fail: true,
        }
    }

    pub fn shown(&self) -> Vec<DesktopNotification> {
        let shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
        shown.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Click the most recent native notification.
    pub fn click_last(&self) -> bool {
        let handler = {
            let shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
            shown.last().map(|(_, h)| h.clone())
        };
        handler.map(|h| h.click()).is_some()
    }
}

impl DesktopSurface for RecordingDesktopSurface {
    fn show(&self, notification: DesktopNotification, on_click: ClickHandler) -> Result<(), DesktopError> {
        if self.fail {
            return Err(DesktopError::PermissionDenied);
        }
        self.shown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((notification, on_click));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorCall {
    Focus,
    Navigate(String),
}

#[derive(Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<NavigatorCall>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NavigatorCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn focus(&self) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NavigatorCall::Focus);
    }

    fn navigate(&self, to: &str) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NavigatorCall::Navigate(to.to_string()));
    }
}
